use crate::error::{AppError, Result};
use dialoguer::Input;
use dialoguer::console::Term;
use std::io::{self, BufRead, IsTerminal};
use url::Url;

const CODE_PROMPT: &str = "Enter the code from that page here";

/// Asks the user to authorize in a browser and hand back the code.
pub trait CodePrompt {
    fn read_code(&self, auth_url: &Url) -> Result<String>;
}

/// Prompts on the console, reading one line from stdin.
pub struct ConsolePrompt;

impl CodePrompt for ConsolePrompt {
    fn read_code(&self, auth_url: &Url) -> Result<String> {
        println!("Authorize this app by visiting this url: {}", auth_url);

        let code = if io::stdin().is_terminal() {
            Input::<String>::new()
                .with_prompt(CODE_PROMPT)
                .interact_text_on(&prompt_term())
                .map_err(|e| AppError::Auth(format!("Failed to read authorization code: {}", e)))?
        } else {
            println!("{}: ", CODE_PROMPT);
            read_line(io::stdin().lock())?
        };

        Ok(code)
    }
}

// Prompts share stdout with the authorization URL.
fn prompt_term() -> Term {
    Term::stdout()
}

fn read_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(AppError::Auth(
            "No authorization code entered before end of input".to_string(),
        ));
    }

    Ok(line.trim().to_string())
}
