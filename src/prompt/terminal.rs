//! Line-oriented terminal prompter
//!
//! Questions are rendered as numbered lists. Answers are read one line at a
//! time; `q` or end of input cancels the selection.

use super::{CheckboxQuestion, ListChoice, ListQuestion, Prompter};
use crate::error::PromptError;
use colored::Colorize;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};

/// Prompter reading answers from `input` and drawing on `output`
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<BufReader<Stdin>, Stderr> {
    /// Prompter on the process terminal
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Create a prompter over the given streams
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return its output stream
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(PromptError::Cancelled);
        }
        Ok(answer.to_string())
    }

    fn render_checkbox(&mut self, question: &CheckboxQuestion, checked: &[bool]) -> io::Result<()> {
        writeln!(self.output, "{} {}", "?".green(), question.message.bold())?;

        let mut index = 0;
        for group in &question.groups {
            writeln!(self.output, "  {}", group.title.dimmed())?;
            for item in &group.items {
                let mark = if checked[index] { "[x]" } else { "[ ]" };
                index += 1;
                writeln!(
                    self.output,
                    "  {} {:>2}) {} - {}",
                    mark,
                    index,
                    item.name.bold(),
                    item.detail
                )?;
            }
        }

        write!(
            self.output,
            "Toggle by number (e.g. 1,3), 'a' to toggle all, enter to confirm, 'q' to cancel: "
        )?;
        self.output.flush()
    }

    fn ask_list(&mut self, question: &ListQuestion) -> Result<String, PromptError> {
        let values: Vec<String> = question.values().map(String::from).collect();
        if values.is_empty() {
            return Ok(question.default.clone());
        }
        let default_index = question.default_index();

        writeln!(self.output, "{} {}", "?".green(), question.message.bold())?;
        let mut number = 0;
        for choice in &question.choices {
            match choice {
                ListChoice::Separator(text) => {
                    writeln!(self.output, "  {}", text.dimmed())?;
                }
                ListChoice::Value { value, description } => {
                    let marker = if number == default_index { ">" } else { " " };
                    number += 1;
                    match description {
                        Some(description) => writeln!(
                            self.output,
                            "{} {:>2}) {} - {}",
                            marker,
                            number,
                            value.yellow(),
                            description
                        )?,
                        None => {
                            writeln!(self.output, "{} {:>2}) {}", marker, number, value.yellow())?
                        }
                    }
                }
            }
        }

        loop {
            write!(
                self.output,
                "Choose 1-{} [{}]: ",
                values.len(),
                default_index + 1
            )?;
            self.output.flush()?;

            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(values[default_index].clone());
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=values.len()).contains(&n) => return Ok(values[n - 1].clone()),
                _ => writeln!(self.output, "  invalid choice '{}'", answer)?,
            }
        }
    }
}

impl<R, W> Prompter for TerminalPrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn checkbox(&mut self, question: &CheckboxQuestion) -> Result<Vec<usize>, PromptError> {
        let mut checked: Vec<bool> = question.items().map(|item| item.checked).collect();

        loop {
            self.render_checkbox(question, &checked)?;
            let answer = self.read_answer()?;

            if answer.is_empty() {
                break;
            }
            if answer.eq_ignore_ascii_case("a") {
                let all = checked.iter().all(|c| *c);
                checked.iter_mut().for_each(|c| *c = !all);
                continue;
            }

            for token in answer.split([',', ' ']).filter(|t| !t.is_empty()) {
                match token.parse::<usize>() {
                    Ok(n) if (1..=checked.len()).contains(&n) => checked[n - 1] = !checked[n - 1],
                    _ => writeln!(self.output, "  ignoring '{}'", token)?,
                }
            }
        }

        Ok(checked
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| i)
            .collect())
    }

    fn list_batch(
        &mut self,
        questions: &[ListQuestion],
    ) -> Result<HashMap<String, String>, PromptError> {
        let mut answers = HashMap::with_capacity(questions.len());
        for question in questions {
            let answer = self.ask_list(question)?;
            answers.insert(question.name.clone(), answer);
        }
        Ok(answers)
    }
}
