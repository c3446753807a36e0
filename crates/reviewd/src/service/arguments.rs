//! Positional argument parsing for each operation.
//!
//! Arguments arrive as an ordered list of strings. Each parser checks arity,
//! applies the optional length bounds and folds document ids to lowercase.

use tracing::debug;

use crate::document::Document;

use super::SERVICE_TARGET;
use super::errors::ServiceError;
use super::operation::Operation;
use super::options::FieldLimits;

/// Arguments of `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// Lowercased document id.
    pub id: String,
    /// Document assembled from the remaining five arguments.
    pub document: Document,
}

/// Arguments of `read`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadArgs {
    /// Lowercased document id.
    pub id: String,
}

/// Arguments of `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    /// Regular expression matched against the `text` field.
    pub pattern: String,
}

const CREATE_PARAMETERS: [&str; 6] = ["id", "text", "review", "name", "location", "rating"];
const READ_PARAMETERS: [&str; 1] = ["id"];
const SEARCH_PARAMETERS: [&str; 1] = ["pattern"];

impl CreateArgs {
    /// Parses `id, text, review, name, location, rating`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BadRequest`] when arguments are missing or a
    /// bounded field is out of range.
    pub fn parse(arguments: &[String], limits: Option<&FieldLimits>) -> Result<Self, ServiceError> {
        let [id, text, review, name, location, rating] =
            positional::<6>(Operation::Create, arguments, &CREATE_PARAMETERS)?;
        if let Some(limits) = limits {
            check_length("id", id, limits.max_id_length)?;
            check_length("text", text, limits.max_text_length)?;
        }
        Ok(Self {
            id: normalize_id(id),
            document: Document::new(text, review, name, location, rating),
        })
    }
}

impl ReadArgs {
    /// Parses `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BadRequest`] when the id is missing or out of
    /// range.
    pub fn parse(arguments: &[String], limits: Option<&FieldLimits>) -> Result<Self, ServiceError> {
        let [id] = positional::<1>(Operation::Read, arguments, &READ_PARAMETERS)?;
        if let Some(limits) = limits {
            check_length("id", id, limits.max_id_length)?;
        }
        Ok(Self {
            id: normalize_id(id),
        })
    }
}

impl SearchArgs {
    /// Parses `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BadRequest`] when the pattern is missing or out
    /// of range.
    pub fn parse(arguments: &[String], limits: Option<&FieldLimits>) -> Result<Self, ServiceError> {
        let [pattern] = positional::<1>(Operation::Search, arguments, &SEARCH_PARAMETERS)?;
        if let Some(limits) = limits {
            check_length("pattern", pattern, limits.max_pattern_length)?;
        }
        Ok(Self {
            pattern: pattern.to_owned(),
        })
    }
}

/// Document ids are case-insensitive; they are stored lowercased.
///
/// Each character folds on its own, so a trailing capital sigma becomes `σ`
/// rather than the word-final `ς`.
#[must_use]
pub fn normalize_id(id: &str) -> String {
    id.chars().flat_map(char::to_lowercase).collect()
}

fn positional<'a, const N: usize>(
    operation: Operation,
    arguments: &'a [String],
    parameters: &[&str; N],
) -> Result<[&'a str; N], ServiceError> {
    if arguments.len() < N {
        return Err(ServiceError::bad_request(format!(
            "{operation} expects {N} arguments ({}), got {}",
            parameters.join(", "),
            arguments.len()
        )));
    }
    if arguments.len() > N {
        debug!(
            target: SERVICE_TARGET,
            %operation,
            ignored = arguments.len() - N,
            "ignoring surplus arguments"
        );
    }
    Ok(std::array::from_fn(|index| arguments[index].as_str()))
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    let length = value.chars().count();
    if (1..=max).contains(&length) {
        Ok(())
    } else {
        Err(ServiceError::bad_request(format!(
            "{field} must be 1 to {max} characters long, got {length}"
        )))
    }
}
