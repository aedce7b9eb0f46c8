use crate::error::{RelayError, RelayResult};

/// Names no client may claim. `server` authors the `/help` replies, so
/// granting it would let a client pass its messages off as system
/// output.
const RESERVED_NAMES: &[&str] = &["server"];

/// Resolves a requested username against the set of names currently in
/// use. Free names are granted unchanged; taken names get the first
/// free numeric suffix (`name-2`, `name-3`, ...). Deterministic and
/// side-effect free; the caller owns the name set.
pub fn claim(candidate: &str, is_taken: impl Fn(&str) -> bool) -> RelayResult<String> {
    let base = candidate.trim();
    if base.is_empty() {
        return Err(RelayError::InvalidName(
            "username must not be empty or whitespace".into(),
        ));
    }
    if RESERVED_NAMES
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
    {
        return Err(RelayError::InvalidName(format!(
            "username {base:?} is reserved"
        )));
    }
    if !is_taken(base) {
        return Ok(base.to_string());
    }
    let mut suffix = 2u32;
    loop {
        let name = format!("{base}-{suffix}");
        if !is_taken(&name) {
            return Ok(name);
        }
        suffix += 1;
    }
}
