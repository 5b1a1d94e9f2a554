//! Interactive prompts
//!
//! The manager talks to the user only through [`Prompter`], so every flow can
//! be driven by a script in tests. [`TerminalPrompter`] renders numbered
//! lists on any `BufRead`/`Write` pair.

use std::io::{self, BufRead, IsTerminal, Write};

/// User interaction surface
pub trait Prompter {
    /// Show a line of output
    fn print(&mut self, message: &str) -> io::Result<()>;

    /// Show text without ending the line
    fn print_partial(&mut self, text: &str) -> io::Result<()>;

    /// Pick exactly one entry of a list
    fn select(&mut self, message: &str, choices: &[String]) -> io::Result<String>;

    /// Pick one entry of a list, narrowing it by typed text first
    fn autocomplete(&mut self, message: &str, choices: &[String]) -> io::Result<String>;

    /// Pick any number of entries of a list
    fn multi_select(&mut self, message: &str, choices: &[String]) -> io::Result<Vec<String>>;

    /// Free text answer, `default` is used for an empty answer
    fn input(&mut self, message: &str, default: Option<&str>) -> io::Result<String>;

    /// Hidden answer for tokens and secret values
    fn secret(&mut self, message: &str) -> io::Result<String>;

    /// Yes/no question, defaults to no
    fn confirm(&mut self, message: &str) -> io::Result<bool>;
}

/// Prompter reading answers line by line
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
    interactive: bool,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        let interactive = io::stdin().is_terminal();
        Self {
            reader: io::stdin().lock(),
            writer: io::stdout(),
            interactive,
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Prompter over arbitrary streams, secrets are read as plain lines
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            interactive: false,
        }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn list(&mut self, message: &str, choices: &[String]) -> io::Result<()> {
        writeln!(self.writer, "? {}", message)?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.writer, "  {:>2}) {}", i + 1, choice)?;
        }
        Ok(())
    }

    fn pick_index(&mut self, choices: &[String]) -> io::Result<usize> {
        if choices.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "nothing to choose from",
            ));
        }
        loop {
            let answer = self.ask(&format!("Enter a number (1-{}): ", choices.len()))?;
            match parse_index(&answer, choices.len()) {
                Some(index) => return Ok(index),
                None => writeln!(self.writer, "Invalid choice: {:?}", answer)?,
            }
        }
    }
}

/// 1-based answer to 0-based index
fn parse_index(answer: &str, len: usize) -> Option<usize> {
    match answer.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Comma or space separated 1-based answers, deduplicated in input order
fn parse_indices(answer: &str, len: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for part in answer.split([',', ' ']).filter(|p| !p.is_empty()) {
        let index = parse_index(part, len)?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    Some(indices)
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn print(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)
    }

    fn print_partial(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "{}", text)?;
        self.writer.flush()
    }

    fn select(&mut self, message: &str, choices: &[String]) -> io::Result<String> {
        self.list(message, choices)?;
        let index = self.pick_index(choices)?;
        Ok(choices[index].clone())
    }

    fn autocomplete(&mut self, message: &str, choices: &[String]) -> io::Result<String> {
        loop {
            let answer = self.ask(&format!("? {} (type to search): ", message))?;
            if let Some(index) = parse_index(&answer, choices.len()) {
                return Ok(choices[index].clone());
            }

            let needle = answer.to_lowercase();
            let matches: Vec<String> = choices
                .iter()
                .filter(|c| c.to_lowercase().contains(&needle))
                .cloned()
                .collect();

            match matches.len() {
                0 => writeln!(self.writer, "No match for {:?}", answer)?,
                1 => return Ok(matches[0].clone()),
                _ => return self.select(message, &matches),
            }
        }
    }

    fn multi_select(&mut self, message: &str, choices: &[String]) -> io::Result<Vec<String>> {
        self.list(message, choices)?;
        loop {
            let answer = self.ask("Enter numbers separated by commas: ")?;
            match parse_indices(&answer, choices.len()) {
                Some(indices) => {
                    return Ok(indices.into_iter().map(|i| choices[i].clone()).collect());
                }
                None => writeln!(self.writer, "Invalid choice: {:?}", answer)?,
            }
        }
    }

    fn input(&mut self, message: &str, default: Option<&str>) -> io::Result<String> {
        let prompt = match default {
            Some(default) => format!("? {} ({}): ", message, default),
            None => format!("? {}: ", message),
        };
        loop {
            let answer = self.ask(&prompt)?;
            match (answer.is_empty(), default) {
                (false, _) => return Ok(answer),
                (true, Some(default)) => return Ok(default.to_string()),
                (true, None) => writeln!(self.writer, "An answer is required")?,
            }
        }
    }

    fn secret(&mut self, message: &str) -> io::Result<String> {
        if self.interactive {
            self.writer.flush()?;
            return rpassword::prompt_password(format!("? {}: ", message));
        }
        write!(self.writer, "? {}: ", message)?;
        self.writer.flush()?;
        let value = rpassword::read_password_from_bufread(&mut self.reader)?;
        writeln!(self.writer)?;
        Ok(value)
    }

    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        writeln!(self.writer, "? {}", message)?;
        loop {
            let answer = self.ask("(y/N): ")?.to_lowercase();
            match answer.as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "Please answer y or n")?,
            }
        }
    }
}
