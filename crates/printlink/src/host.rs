use printlink_plugins::{Host, MenuItem, Notifier};
use std::io::{BufRead, Write};
use std::sync::Mutex;

/// Host backed by the terminal: notifications go to stdout, prompts read stdin
pub struct TerminalHost {
    menu: Vec<MenuItem>,
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::with_input(Box::new(std::io::BufReader::new(std::io::stdin())))
    }

    pub fn with_input(input: Box<dyn BufRead + Send>) -> Self {
        Self {
            menu: Vec::new(),
            input: Mutex::new(input),
        }
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }
}

impl Host for TerminalHost {
    fn add_menu_item(&mut self, item: MenuItem) {
        self.menu.push(item);
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        print!("{} [{}] ", message, default);
        std::io::stdout().flush().ok();

        let mut line = String::new();
        let mut input = self.input.lock().ok()?;
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim();
                if answer.is_empty() {
                    Some(default.to_string())
                } else {
                    Some(answer.to_string())
                }
            }
        }
    }
}

/// Notifier for programmatic sends
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}
