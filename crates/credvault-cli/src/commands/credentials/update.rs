use credvault_core::CredentialUpdate;

use crate::app::AppContext;
use crate::cli::UpdateArgs;
use crate::errors::CliError;
use crate::helpers::{parse_record_id, read_secret};

fn build_update(args: &UpdateArgs) -> anyhow::Result<CredentialUpdate> {
    let secret = if args.secret.is_some() || args.prompt_secret {
        Some(read_secret(args.secret.clone(), args.no_input)?)
    } else {
        None
    };

    let update = CredentialUpdate {
        site: args.site.clone(),
        secret,
        username: args.username.clone(),
        url: args.url.clone(),
        notes: args.notes.clone(),
    };
    if update.is_empty() {
        return Err(CliError::invalid_input(
            "Nothing to update\nHint: Pass --site, --secret, --prompt-secret, --username, --url or --notes.",
        )
        .into());
    }
    Ok(update)
}

pub fn handle_update(ctx: &AppContext, args: &UpdateArgs) -> anyhow::Result<()> {
    let id = parse_record_id(args.id)?;
    let update = build_update(args)?;

    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;
    session.update_credential(id, update)?;

    if !ctx.quiet() {
        println!("Updated credential {}", id);
    }
    Ok(())
}
