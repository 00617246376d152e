//! Interactive field prompts
//!
//! Each field is asked for in order. Leaving a line empty keeps the
//! current value and a lone `-` clears it. A value that fails validation
//! is reported and asked for again, the way the web form flags a field
//! when it loses focus.

use anyhow::Result;
use colored::Colorize;
use formdesk_client::ResponseSession;
use std::io::{BufRead, Write};

/// Prompt for every field of `session`; stops quietly at end of input
pub fn fill<R: BufRead, W: Write>(
    session: &mut ResponseSession,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let fields: Vec<_> = session
        .fields()
        .iter()
        .map(|f| (f.id.clone(), f.label.clone(), f.field_type))
        .collect();

    for (id, label, field_type) in fields {
        loop {
            let current = session.value(&id);
            if current.is_empty() {
                write!(out, "{} ({}): ", label, field_type)?;
            } else {
                write!(out, "{} ({}) [{}]: ", label, field_type, current)?;
            }
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let line = line.trim_end_matches(['\r', '\n']);
            match line {
                "" => {}
                "-" => session.set_value(&id, "")?,
                typed => session.set_value(&id, typed)?,
            }

            match session.blur(&id)? {
                Some(err) => writeln!(out, "  {}", err.message().red())?,
                None => break,
            }
        }
    }
    Ok(())
}
