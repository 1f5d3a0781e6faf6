use crate::app::AppContext;
use crate::cli::{ProfileArgs, UnregisterArgs};
use crate::helpers::confirm;
use crate::output::{print_profile, profile_json};

pub fn handle_register(ctx: &AppContext) -> anyhow::Result<()> {
    let gate = ctx.open_gate()?;
    let principal = gate.register(&ctx.authenticator())?;
    if !ctx.quiet() {
        println!("Registered {}", principal.id);
    }
    Ok(())
}

pub fn handle_profile(ctx: &AppContext, args: &ProfileArgs) -> anyhow::Result<()> {
    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;
    let profile = session.profile()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile_json(&profile)?)?);
    } else {
        print_profile(&profile);
    }
    Ok(())
}

pub fn handle_unregister(ctx: &AppContext, args: &UnregisterArgs) -> anyhow::Result<()> {
    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;
    let principal = session.principal().clone();

    let prompt = format!(
        "Delete user {} and all of their credentials? This cannot be undone",
        principal
    );
    if !confirm(&prompt, args.yes)? {
        if !ctx.quiet() {
            println!("Aborted");
        }
        return Ok(());
    }

    session.unregister()?;
    if !ctx.quiet() {
        println!("Unregistered {}", principal);
    }
    Ok(())
}
