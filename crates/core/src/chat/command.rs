//! Quick commands answered directly from the task tools.

use st_protocol::Priority;

/// Substrings that make the chat front door try a quick command first.
pub const QUICK_KEYWORDS: [&str; 5] = [
    "add ",
    "list tasks",
    "show top",
    "delete previous month",
    "list goals",
];

const GREETINGS: [(&str, &str); 5] = [
    ("hi", "Hello! I'm SmartTask. How can I help with your tasks?"),
    ("hello", "Hi there! I'm here to help you manage tasks and goals."),
    ("hey", "Hey! Ready to organize your tasks?"),
    ("hola", "¡Hola! I'm your task assistant."),
    ("how are you", "I'm doing great! Ready to help you manage your tasks."),
];

const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickCommand {
    /// A canned reply to a greeting.
    Greeting(&'static str),
    AddTask {
        title: String,
        due: Option<String>,
        priority: Priority,
    },
    ListTasks,
    ListGoals,
    ShowTop(usize),
    DeletePreviousMonth,
}

impl QuickCommand {
    /// Parse `text` as a quick command.
    ///
    /// `add` needs a title longer than three characters; shorter titles
    /// are not a command.
    ///
    /// # Examples
    ///
    /// ```
    /// use st_core::chat::QuickCommand;
    /// use st_protocol::Priority;
    ///
    /// assert_eq!(
    ///     QuickCommand::parse("add Pay rent due 2024-03-01 priority high"),
    ///     Some(QuickCommand::AddTask {
    ///         title: "Pay rent".to_string(),
    ///         due: Some("2024-03-01".to_string()),
    ///         priority: Priority::High,
    ///     })
    /// );
    /// assert_eq!(QuickCommand::parse("show top 5"), Some(QuickCommand::ShowTop(5)));
    /// assert_eq!(QuickCommand::parse("what should I do?"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let lower = text.to_lowercase();

        if let Some((_, reply)) = GREETINGS.iter().find(|(greeting, _)| *greeting == lower) {
            return Some(Self::Greeting(*reply));
        }

        if text.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("add ")) {
            return parse_add(text[4..].trim());
        }

        match lower.as_str() {
            "list tasks" | "show tasks" | "tasks" => return Some(Self::ListTasks),
            "list goals" | "show goals" | "goals" => return Some(Self::ListGoals),
            "delete previous month" => return Some(Self::DeletePreviousMonth),
            _ => {}
        }

        if lower.starts_with("show top") {
            let n = lower
                .split_whitespace()
                .nth(2)
                .filter(|word| word.chars().all(|c| c.is_ascii_digit()))
                .and_then(|word| word.parse().ok())
                .unwrap_or(DEFAULT_TOP_N);
            return Some(Self::ShowTop(n));
        }

        None
    }
}

/// Whether `text` mentions any of [`QUICK_KEYWORDS`].
pub fn has_quick_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUICK_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn parse_add(body: &str) -> Option<QuickCommand> {
    let mut body = body.to_string();
    let mut priority = Priority::Medium;

    for (marker, level) in [
        (" priority high", Priority::High),
        (" priority low", Priority::Low),
        (" priority medium", Priority::Medium),
    ] {
        if let Some(at) = find_ignore_ascii_case(&body, marker) {
            body.replace_range(at..at + marker.len(), "");
            priority = level;
            break;
        }
    }

    let (title, due) = match find_ignore_ascii_case(&body, " due ") {
        Some(at) => {
            let due = body[at + 5..].split_whitespace().next().map(str::to_string);
            (body[..at].trim().to_string(), due)
        }
        None => (body.trim().to_string(), None),
    };

    (title.chars().count() > 3).then_some(QuickCommand::AddTask {
        title,
        due,
        priority,
    })
}

/// Byte offset of the first ASCII case-insensitive match of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    let bytes = haystack.as_bytes();
    (0..=bytes.len().checked_sub(needle.len())?)
        .find(|&i| haystack.is_char_boundary(i) && bytes[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
