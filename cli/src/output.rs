//! Output formatting

use clap::ValueEnum;
use formdesk_client::{Field, FormDefinition};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s.trim(), true).ok()
    }

    /// Render structured data; tables fall back to pretty JSON
    pub fn render<T: Serialize>(&self, data: &T) -> String {
        match self {
            OutputFormat::Yaml => serde_yaml::to_string(data).unwrap_or_default(),
            OutputFormat::Json | OutputFormat::Table => {
                serde_json::to_string_pretty(data).unwrap_or_default()
            }
        }
    }

    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.render(data));
    }

    pub fn print_form(&self, form: &FormDefinition) {
        match self {
            OutputFormat::Table => println!("{}", form_table(form)),
            _ => self.print(form),
        }
    }

    pub fn print_answers(&self, answers: &serde_json::Map<String, serde_json::Value>) {
        match self {
            OutputFormat::Table => println!("{}", answers_table(answers)),
            _ => self.print(answers),
        }
    }
}

#[derive(Tabled)]
struct FieldRow<'a> {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Label")]
    label: &'a str,
    #[tabled(rename = "Type")]
    field_type: &'static str,
    #[tabled(rename = "Id")]
    id: &'a str,
}

impl<'a> FieldRow<'a> {
    fn new(position: usize, field: &'a Field) -> Self {
        Self {
            position: position + 1,
            label: &field.label,
            field_type: field.field_type.as_str(),
            id: field.id.as_str(),
        }
    }
}

#[derive(Tabled)]
struct AnswerRow {
    #[tabled(rename = "Field")]
    label: String,
    #[tabled(rename = "Answer")]
    value: String,
}

pub fn form_table(form: &FormDefinition) -> String {
    let rows: Vec<FieldRow<'_>> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| FieldRow::new(i, f))
        .collect();
    let title = form.title.as_deref().unwrap_or("Untitled form");
    format!("{}\n{}", title, Table::new(rows))
}

pub fn answers_table(answers: &serde_json::Map<String, serde_json::Value>) -> String {
    let rows: Vec<AnswerRow> = answers
        .iter()
        .map(|(label, value)| AnswerRow {
            label: label.clone(),
            value: match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
        .collect();
    Table::new(rows).to_string()
}
