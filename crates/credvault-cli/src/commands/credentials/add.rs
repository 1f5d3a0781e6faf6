use credvault_core::storage::CredentialMetadata;
use credvault_core::NewCredential;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::read_secret;

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;

    let credential = NewCredential {
        site: args.site.clone(),
        secret: read_secret(args.secret.clone(), args.no_input)?,
        metadata: CredentialMetadata {
            username: args.username.clone(),
            url: args.url.clone(),
            notes: args.notes.clone(),
        },
    };
    let id = session.add_credential(credential)?;

    if args.json {
        println!("{}", serde_json::json!({ "id": id }));
    } else if ctx.quiet() {
        println!("{}", id);
    } else {
        println!("Added credential {} ({})", id, args.site.trim());
    }
    Ok(())
}
