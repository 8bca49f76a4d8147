//! Line-oriented follow-up chat over stdin

use crate::writeln_safe;
use reportkit::{ChatModel, StudySession, StudySettings};
use std::io::{self, BufRead};

/// Commands that end the conversation
const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", ":q"];

/// Answer one question per stdin line until EOF or an exit command
///
/// A failed answer is reported on stderr and the conversation continues.
pub async fn run<M: ChatModel>(session: &mut StudySession, model: &M, settings: &StudySettings) {
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                continue;
            }
        };

        let Some(question) = parse_question(&line) else {
            continue;
        };
        if is_exit(question) {
            break;
        }

        match session.ask(model, settings, question).await {
            Ok(answer) => writeln_safe(answer),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

fn parse_question(line: &str) -> Option<&str> {
    let question = line.trim();
    (!question.is_empty()).then_some(question)
}

fn is_exit(question: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|cmd| question.eq_ignore_ascii_case(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question() {
        assert_eq!(parse_question("  댐 방류 기준은?  "), Some("댐 방류 기준은?"));
        assert_eq!(parse_question("   "), None);
        assert_eq!(parse_question(""), None);
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit("exit"));
        assert!(is_exit("QUIT"));
        assert!(is_exit(":q"));
        assert!(!is_exit("exit strategy?"));
    }
}
