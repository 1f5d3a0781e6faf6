use crate::app::AppContext;
use crate::cli::GetArgs;
use crate::helpers::parse_record_id;
use crate::output::{credential_json, print_credential};

pub fn handle_get(ctx: &AppContext, args: &GetArgs) -> anyhow::Result<()> {
    let id = parse_record_id(args.id)?;
    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;
    let credential = session.get_credential(id)?;

    if args.json {
        let output = serde_json::to_string_pretty(&credential_json(&credential))?;
        println!("{}", output);
    } else {
        print_credential(&credential, ctx.quiet() || args.secret_only);
    }
    Ok(())
}
