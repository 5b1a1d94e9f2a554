//! List, filter, label and choose
//!
//! Every remote listing the user picks from goes through [`list_and_choose`].
//! Choices carry their record next to the label, so the answer maps straight
//! back to the record without parsing the label.

use crate::error::{ManagerError, Result};
use crate::prompt::Prompter;
use gh_client::{RunConclusion, WorkflowRun};
use std::future::Future;

/// How the choice is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    List,
    Autocomplete,
}

/// A labelled record offered to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub label: String,
    pub record: T,
}

/// Prompt settings of one selection
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub message: &'a str,
    pub style: ChoiceStyle,
    /// Error message when nothing is left to choose from
    pub empty: &'a str,
}

/// Let the user pick one record
pub fn choose<T>(
    prompter: &mut dyn Prompter,
    selection: Selection<'_>,
    choices: Vec<Choice<T>>,
) -> Result<T> {
    if choices.is_empty() {
        return Err(ManagerError::EmptyResult(selection.empty.to_string()));
    }

    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
    let answer = match selection.style {
        ChoiceStyle::List => prompter.select(selection.message, &labels)?,
        ChoiceStyle::Autocomplete => prompter.autocomplete(selection.message, &labels)?,
    };

    choices
        .into_iter()
        .find(|c| c.label == answer)
        .map(|c| c.record)
        .ok_or_else(|| {
            ManagerError::Prompt(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{:?} is not one of the offered choices", answer),
            ))
        })
}

/// Fetch all records, keep the matching ones and let the user pick one
pub async fn list_and_choose<T, Fut>(
    prompter: &mut dyn Prompter,
    selection: Selection<'_>,
    fetch: Fut,
    keep: impl Fn(&T) -> bool,
    label: impl Fn(&T) -> String,
) -> Result<T>
where
    Fut: Future<Output = Result<Vec<T>>>,
{
    let records = fetch.await?;
    let total = records.len();

    let choices: Vec<Choice<T>> = records
        .into_iter()
        .filter(|r| keep(r))
        .map(|record| Choice {
            label: label(&record),
            record,
        })
        .collect();
    log::debug!("{} of {} records offered for {:?}", choices.len(), total, selection.message);

    choose(prompter, selection, choices)
}

/// Label of a workflow run in selection lists
pub fn run_label(run: &WorkflowRun) -> String {
    format!(
        "Workflow Run ID: {} - Run Number: {} - Triggering Event: {}",
        run.id, run.run_number, run.event
    )
}

/// Runs that have finished
pub fn is_completed(run: &WorkflowRun) -> bool {
    run.is_completed()
}

/// Runs that were cancelled
pub fn is_cancelled(run: &WorkflowRun) -> bool {
    run.conclusion() == Some(RunConclusion::Cancelled)
}
