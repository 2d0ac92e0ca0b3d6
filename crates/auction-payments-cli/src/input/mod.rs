pub mod file;
pub mod stdin;

use auction_payments_core::lot::check_magnitude;
use auction_payments_core::report::PaymentSessionInput;

/// Load a session from `--input`, falling back to JSON or YAML piped on
/// stdin. Sessions whose amounts exceed the decimal range are rejected.
pub fn load_session(
    path: Option<&str>,
    command: &str,
) -> Result<PaymentSessionInput, Box<dyn std::error::Error>> {
    let session: PaymentSessionInput = if let Some(path) = path {
        file::read_session(path)?
    } else if let Some(session) = stdin::read_stdin()? {
        session
    } else {
        return Err(format!("--input <session.json|yaml> or stdin required for {command}").into());
    };
    check_magnitude(&session.lots, &session.config)?;
    Ok(session)
}
