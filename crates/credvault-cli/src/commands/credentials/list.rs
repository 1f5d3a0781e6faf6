use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{credential_table, summaries_json};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;
    let summaries = session.list_credentials()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries_json(&summaries)?)?);
        return Ok(());
    }

    if summaries.is_empty() {
        if !ctx.quiet() {
            println!("No credentials stored for {}", session.principal());
        }
        return Ok(());
    }

    if ctx.quiet() {
        for summary in &summaries {
            println!("{}\t{}", summary.id, summary.site);
        }
    } else {
        println!("{}", credential_table(&summaries));
    }
    Ok(())
}
