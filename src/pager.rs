//! Page-by-page terminal output.
//!
//! The pager knows nothing about what it shows. Callers hand it a slice and a
//! renderer; the three stock renderers cover project/suite listings
//! ([`format_basic`]), the menu ([`format_menu`]) and search hits
//! ([`format_result`]).

use crate::prompt::{Continuation, Prompt};
use std::fmt::Display;
use std::io::{self, Write};

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const CONTINUE_QUESTION: &str = "Hit any key to continue press q to quit ";
const ID_WIDTH: usize = 7;
const CASE_VIEW_PATH: &str = "index.php?/cases/view/";

/// Items listed by name, such as projects and suites.
pub trait Named {
    fn name(&self) -> &str;
}

/// Items that link to a case page.
pub trait CaseLink {
    fn case_id(&self) -> String;
    fn case_title(&self) -> &str;
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: CaseLink + ?Sized> CaseLink for &T {
    fn case_id(&self) -> String {
        (**self).case_id()
    }

    fn case_title(&self) -> &str {
        (**self).case_title()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Completed,
    Quit,
}

pub fn format_basic<T: Named>(index: usize, item: &T) -> String {
    format!("{} - {}", index, item.name())
}

pub fn format_menu<T: Display>(item: &T) -> String {
    item.to_string()
}

pub fn format_result<T: CaseLink>(item: &T, base_url: &str) -> String {
    let id = item.case_id();
    format!(
        "| {:<width$} | {} |\n| {}{}{}\n|______ ",
        id,
        item.case_title(),
        base_url,
        CASE_VIEW_PATH,
        id,
        width = ID_WIDTH
    )
}

pub struct Pager<'a, P: ?Sized, W: ?Sized> {
    prompt: &'a mut P,
    out: &'a mut W,
    page_size: usize,
}

impl<'a, P: Prompt + ?Sized, W: Write + ?Sized> Pager<'a, P, W> {
    /// A `page_size` of zero is treated as one.
    pub fn new(prompt: &'a mut P, out: &'a mut W, page_size: usize) -> Self {
        Self {
            prompt,
            out,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Writes one rendered block per item, asking whether to go on after
    /// every full page.
    pub fn page<T, F>(&mut self, items: &[T], mut render: F) -> io::Result<PageOutcome>
    where
        F: FnMut(usize, &T) -> String,
    {
        for (index, item) in items.iter().enumerate() {
            if index > 0 && index % self.page_size == 0 {
                let answer = self.prompt.ask(CONTINUE_QUESTION)?;
                if Continuation::from_answer(&answer) == Continuation::Quit {
                    return Ok(PageOutcome::Quit);
                }
            }
            writeln!(self.out, "{}", render(index, item))?;
        }
        Ok(PageOutcome::Completed)
    }

    pub fn page_basic<T: Named>(&mut self, items: &[T]) -> io::Result<PageOutcome> {
        self.page(items, |index, item| format_basic(index, item))
    }

    pub fn page_menu<T: Display>(&mut self, items: &[T]) -> io::Result<PageOutcome> {
        self.page(items, |_, item| format_menu(item))
    }

    pub fn page_results<T: CaseLink>(
        &mut self,
        items: &[T],
        base_url: &str,
    ) -> io::Result<PageOutcome> {
        self.page(items, |_, item| format_result(item, base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::MockPrompt;
    use crate::record::{Case, Project};

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_single_prompt_between_windows() {
        let items: Vec<usize> = (0..30).collect();
        let mut prompt = MockPrompt::new();
        prompt
            .expect_ask()
            .withf(|q| q == CONTINUE_QUESTION)
            .times(1)
            .returning(|_| Ok(String::new()));
        let mut out: Vec<u8> = Vec::new();

        let outcome = Pager::new(&mut prompt, &mut out, 25)
            .page_menu(&items)
            .unwrap();

        assert_eq!(outcome, PageOutcome::Completed);
        assert_eq!(lines(&out).len(), 30);
    }

    #[test]
    fn test_quit_stops_after_first_window() {
        let items: Vec<usize> = (0..30).collect();
        let mut prompt = MockPrompt::new();
        prompt
            .expect_ask()
            .times(1)
            .returning(|_| Ok("q".to_string()));
        let mut out: Vec<u8> = Vec::new();

        let outcome = Pager::new(&mut prompt, &mut out, 25)
            .page_menu(&items)
            .unwrap();

        let rendered = lines(&out);
        assert_eq!(outcome, PageOutcome::Quit);
        assert_eq!(rendered.len(), 25);
        assert_eq!(rendered.last().map(String::as_str), Some("24"));
    }

    #[test]
    fn test_no_prompt_for_exact_page() {
        let items: Vec<usize> = (0..25).collect();
        let mut prompt = MockPrompt::new();
        prompt.expect_ask().never();
        let mut out: Vec<u8> = Vec::new();

        Pager::new(&mut prompt, &mut out, 25).page_menu(&items).unwrap();
        assert_eq!(lines(&out).len(), 25);
    }

    #[test]
    fn test_prompt_per_window() {
        let items: Vec<usize> = (0..7).collect();
        let mut prompt = MockPrompt::new();
        prompt
            .expect_ask()
            .times(3)
            .returning(|_| Ok("y".to_string()));
        let mut out: Vec<u8> = Vec::new();

        Pager::new(&mut prompt, &mut out, 2).page_menu(&items).unwrap();
        assert_eq!(lines(&out).len(), 7);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let mut prompt = MockPrompt::new();
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(Pager::new(&mut prompt, &mut out, 0).page_size(), 1);
    }

    #[test]
    fn test_basic_rendering() {
        let projects = vec![
            Project {
                id: 10,
                name: "Web".into(),
            },
            Project {
                id: 11,
                name: "Mobile".into(),
            },
        ];
        let mut prompt = MockPrompt::new();
        let mut out: Vec<u8> = Vec::new();

        Pager::new(&mut prompt, &mut out, DEFAULT_PAGE_SIZE)
            .page_basic(&projects)
            .unwrap();

        assert_eq!(lines(&out), vec!["0 - Web", "1 - Mobile"]);
    }

    #[test]
    fn test_menu_rendering_is_verbatim() {
        let menu = ["p - select project", "q - exit"];
        let mut prompt = MockPrompt::new();
        let mut out: Vec<u8> = Vec::new();

        Pager::new(&mut prompt, &mut out, DEFAULT_PAGE_SIZE)
            .page_menu(&menu)
            .unwrap();

        assert_eq!(lines(&out), vec!["p - select project", "q - exit"]);
    }

    #[test]
    fn test_result_block() {
        let case = Case::new(1401u64, "Login works");
        assert_eq!(
            format_result(&case, "https://qa.example.com/"),
            "| 1401    | Login works |\n| https://qa.example.com/index.php?/cases/view/1401\n|______ "
        );
    }

    #[test]
    fn test_result_rendering_of_borrowed_cases() {
        let cases = [Case::new(1u64, "a"), Case::new(12345678u64, "b")];
        let found: Vec<&Case> = cases.iter().collect();
        let mut prompt = MockPrompt::new();
        let mut out: Vec<u8> = Vec::new();

        Pager::new(&mut prompt, &mut out, DEFAULT_PAGE_SIZE)
            .page_results(&found, "http://tr/")
            .unwrap();

        let rendered = lines(&out);
        assert_eq!(rendered.len(), 6);
        assert_eq!(rendered[0], "| 1       | a |");
        assert_eq!(rendered[3], "| 12345678 | b |");
        assert_eq!(rendered[4], "| http://tr/index.php?/cases/view/12345678");
    }
}
