//! Response commands

use super::{parse_answer, Settings};
use crate::{output::OutputFormat, prompt, ResponseCommands};
use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use formdesk_client::{
    load_edit_session, EditLink, FormsBackend, FormsError, ResponseSession, SubmitOutcome,
};

/// `formdesk respond`: fill out a form and submit it
pub async fn respond(
    form_id: &str,
    answers: &[String],
    interactive: bool,
    settings: &Settings,
) -> Result<()> {
    let client = settings.client()?;
    let form = client.get_form(form_id).await?;
    let mut session =
        ResponseSession::new(form_id, form).with_link_base(client.config().link_base().to_string());

    fill(&mut session, answers, interactive)?;
    submit(&mut session, &client).await
}

pub async fn handle(action: ResponseCommands, settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client()?;

    match action {
        ResponseCommands::Show {
            form_id,
            response_id,
            token,
        } => {
            let stored = client.get_response(&form_id, &response_id, &token).await?;
            format.print_answers(&stored.answers);
        }
        ResponseCommands::Edit {
            form_id,
            response_id,
            token,
            link,
            answers,
            interactive,
        } => {
            let (form_id, response_id, token) = match link {
                Some(link) => {
                    let link = EditLink::parse(&link)?;
                    (link.form_id, link.response_id, link.edit_token)
                }
                None => (
                    form_id.unwrap_or_default(),
                    response_id.unwrap_or_default(),
                    token.unwrap_or_default(),
                ),
            };

            let mut session = load_edit_session(&client, &form_id, &response_id, &token).await?;
            fill(&mut session, &answers, interactive)?;
            submit(&mut session, &client).await?;
        }
    }
    Ok(())
}

fn fill(session: &mut ResponseSession, answers: &[String], interactive: bool) -> Result<()> {
    for arg in answers {
        let (label, value) = parse_answer(arg)?;
        let id = session
            .fields()
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.id.clone())
            .ok_or_else(|| anyhow!("Form has no field labelled {:?}", label))?;
        session.set_value(&id, value)?;
    }

    if interactive {
        if let Some(title) = session.title() {
            println!("{}", title.bold());
        }
        let stdin = std::io::stdin();
        prompt::fill(session, &mut stdin.lock(), &mut std::io::stdout())?;
    }
    Ok(())
}

async fn submit(session: &mut ResponseSession, client: &dyn FormsBackend) -> Result<()> {
    match session.submit(client).await {
        Ok(outcome) => {
            println!("{}", outcome.message().green());
            if let SubmitOutcome::Submitted { receipt, edit_link } = &outcome {
                match (edit_link, receipt.edit_credentials()) {
                    (Some(link), _) => {
                        println!("Save this link to edit your response later: {}", link);
                    }
                    (None, Some((response_id, token))) => {
                        println!("Response id: {}  Edit token: {}", response_id, token);
                    }
                    (None, None) => {}
                }
            }
            Ok(())
        }
        Err(FormsError::Validation(errors)) => {
            for field in session.fields() {
                if let Some(err) = errors.get(&field.id) {
                    eprintln!("  {}: {}", field.label.bold(), err.message().red());
                }
            }
            bail!("{}", FormsError::Validation(errors))
        }
        Err(e) => Err(e.into()),
    }
}
