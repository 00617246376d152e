//! Form commands

use super::{parse_field_spec, Settings};
use crate::{output::OutputFormat, FormCommands};
use anyhow::{anyhow, Result};
use colored::Colorize;
use formdesk_client::{FormDraft, FormsBackend};

pub async fn handle(action: FormCommands, settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client()?;

    match action {
        FormCommands::Create { title, fields } => {
            let mut draft = FormDraft::new();
            if let Some(title) = title {
                draft.set_title(title);
            }
            for spec in &fields {
                let (label, kind) = parse_field_spec(spec)?;
                draft.add_field(label, kind);
            }

            let id = draft.save(&client).await?;
            println!("{} {}", "Created form:".green(), id);
            println!("Share it with: formdesk respond {}", id);
        }
        FormCommands::Show { id } => {
            let form = client.get_form(&id).await?;
            format.print_form(&form);
        }
        FormCommands::Edit {
            id,
            title,
            add,
            remove,
            retype,
        } => {
            let form = client.get_form(&id).await?;
            let mut draft = FormDraft::from_form(&id, form);

            if let Some(title) = title {
                draft.set_title(title);
            }
            for label in &remove {
                let field_id = draft
                    .find_by_label(label.trim())
                    .cloned()
                    .ok_or_else(|| anyhow!("No field labelled {:?}", label))?;
                draft.remove_field(&field_id)?;
            }
            for spec in &retype {
                let (label, kind) = parse_field_spec(spec)?;
                let field_id = draft
                    .find_by_label(&label)
                    .cloned()
                    .ok_or_else(|| anyhow!("No field labelled {:?}", label))?;
                draft.set_type(&field_id, kind)?;
            }
            for spec in &add {
                let (label, kind) = parse_field_spec(spec)?;
                draft.add_field(label, kind);
            }

            draft.save(&client).await?;
            println!("{} {}", "Updated form:".green(), id);
        }
    }
    Ok(())
}
