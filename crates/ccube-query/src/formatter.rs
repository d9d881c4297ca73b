//! Result formatting: JSON, Table, and Markdown output.

use serde::Serialize;

use crate::answers::AnswerListing;
use crate::questions::QuestionListing;
use crate::tags::TagListing;
use crate::votes::VoteListing;

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Markdown,
}

/// A listing that can be laid out as rows under fixed columns.
pub trait Tabular {
    fn columns(&self) -> &'static [&'static str];
    fn rows(&self) -> Vec<Vec<String>>;
}

impl Tabular for QuestionListing {
    fn columns(&self) -> &'static [&'static str] {
        &["id", "title", "votes", "views", "answers", "tags"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.questions
            .iter()
            .map(|q| {
                vec![
                    q.id.clone(),
                    q.title.clone(),
                    q.votes.to_string(),
                    q.views.to_string(),
                    q.answer_count.to_string(),
                    q.tags.join(", "),
                ]
            })
            .collect()
    }
}

impl Tabular for AnswerListing {
    fn columns(&self) -> &'static [&'static str] {
        &["id", "accepted", "score", "created_at"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.answers
            .iter()
            .map(|a| {
                vec![
                    a.id.clone(),
                    a.is_accepted.to_string(),
                    a.vote_score().to_string(),
                    a.created_at.map(|c| c.to_rfc3339()).unwrap_or_default(),
                ]
            })
            .collect()
    }
}

impl Tabular for VoteListing {
    fn columns(&self) -> &'static [&'static str] {
        &["id", "voter", "wallet", "type", "weight"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.votes
            .iter()
            .map(|v| {
                vec![
                    v.id.clone(),
                    v.voter_name.clone(),
                    v.voter_wallet.clone(),
                    v.vote_type.as_str().to_string(),
                    v.vote_weight.to_string(),
                ]
            })
            .collect()
    }
}

impl Tabular for TagListing {
    fn columns(&self) -> &'static [&'static str] {
        &["name", "category", "questions", "trending"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.tags
            .iter()
            .map(|t| {
                vec![
                    t.name.clone(),
                    t.category.clone(),
                    t.question_count.to_string(),
                    format!("{:.1}", t.trending_score),
                ]
            })
            .collect()
    }
}

/// Format a listing in the requested output format.
#[must_use]
pub fn format_results<T: Tabular + Serialize>(result: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Table => format_table(result.columns(), &result.rows()),
        OutputFormat::Markdown => format_markdown(result.columns(), &result.rows()),
    }
}

/// Pretty JSON for any payload.
#[must_use]
pub fn format_json<T: Serialize + ?Sized>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

fn format_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no results)".to_string();
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();

    // Header
    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
        .collect();
    output.push_str(&header.join(" | "));
    output.push('\n');

    // Separator
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&sep.join("-+-"));
    output.push('\n');

    for row in rows {
        let vals: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
            .collect();
        output.push_str(&vals.join(" | "));
        output.push('\n');
    }

    output
}

fn format_markdown(columns: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "*No results*\n".to_string();
    }

    let mut output = String::new();

    output.push_str("| ");
    output.push_str(&columns.join(" | "));
    output.push_str(" |\n");

    output.push_str("| ");
    let seps: Vec<&str> = columns.iter().map(|_| "---").collect();
    output.push_str(&seps.join(" | "));
    output.push_str(" |\n");

    for row in rows {
        output.push_str("| ");
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        output.push_str(&cells.join(" | "));
        output.push_str(" |\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{ListFilters, QuestionSort};
    use ccube_core::{paginate, Question};

    fn sample_listing() -> QuestionListing {
        let mut q1 = Question::new("q1", "Deploy a BEP20 token");
        q1.tags = vec!["bsc".to_string(), "token".to_string()];
        q1.votes = 4;
        let q2 = Question::new("q2", "Pipes | in titles");
        let (questions, pagination) = paginate(vec![q1, q2], 0, 20);
        QuestionListing {
            questions,
            pagination,
            filters: ListFilters {
                category: None,
                sort: QuestionSort::Newest,
                search: None,
            },
        }
    }

    #[test]
    fn format_as_json() {
        let output = format_results(&sample_listing(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["pagination"]["total"], 2);
        assert_eq!(parsed["questions"][0]["id"], "q1");
    }

    #[test]
    fn format_as_table() {
        let output = format_results(&sample_listing(), OutputFormat::Table);
        let mut lines = output.lines();
        assert!(lines.next().unwrap().starts_with("id | title"));
        assert!(lines.next().unwrap().contains("-+-"));
        assert!(output.contains("bsc, token"));
    }

    #[test]
    fn format_as_markdown_escapes_pipes() {
        let output = format_results(&sample_listing(), OutputFormat::Markdown);
        assert!(output.starts_with("| id | title"));
        assert!(output.contains("| --- |"));
        assert!(output.contains("Pipes \\| in titles"));
    }

    #[test]
    fn format_empty_listing() {
        let (questions, pagination) = paginate(Vec::<Question>::new(), 0, 20);
        let listing = QuestionListing {
            questions,
            pagination,
            filters: ListFilters {
                category: None,
                sort: QuestionSort::Votes,
                search: None,
            },
        };
        assert_eq!(format_results(&listing, OutputFormat::Table), "(no results)");
        assert_eq!(
            format_results(&listing, OutputFormat::Markdown),
            "*No results*\n"
        );
    }
}
