use dialoguer::{Input, Password};
use std::io::{self, BufRead, Write};

/// Synchronous source of user answers.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Like [`Prompt::ask`], without echoing the answer.
    fn ask_secret(&mut self, question: &str) -> io::Result<String>;
}

/// Answer to the "continue or quit" question asked between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Quit,
}

impl Continuation {
    pub fn from_answer(answer: &str) -> Self {
        if is_quit(answer) {
            Continuation::Quit
        } else {
            Continuation::Continue
        }
    }
}

/// `q` in either case quits; every other answer means "go on".
pub fn is_quit(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("q")
}

fn dialoguer_prompt(question: &str) -> &str {
    // dialoguer appends its own ": "
    question.trim_end().trim_end_matches(':')
}

/// Terminal prompt backed by `dialoguer`.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(dialoguer_prompt(question))
            .allow_empty(true)
            .interact_text()
            .map_err(io::Error::other)
    }

    fn ask_secret(&mut self, question: &str) -> io::Result<String> {
        Password::new()
            .with_prompt(dialoguer_prompt(question))
            .allow_empty_password(true)
            .interact()
            .map_err(io::Error::other)
    }
}

/// Line-oriented prompt for piped input, where `dialoguer` refuses to run.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, question: &str) -> io::Result<String> {
        self.ask(question)
    }
}
