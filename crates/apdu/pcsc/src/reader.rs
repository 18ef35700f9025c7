//! Listing and connecting to readers known to the PC/SC resource manager
//!
//! Discovering *when* a reader is plugged in or removed is out of scope here —
//! callers poll [`list_readers`] themselves if they need to react to changes.

use pcsc::Context;

use crate::error::PcscError;

/// List the names of readers currently known to the PC/SC resource manager
pub fn list_readers(context: &Context) -> Result<Vec<String>, PcscError> {
    let mut buf = vec![0u8; 2048];
    let readers = context.list_readers(&mut buf)?;
    Ok(readers.map(|name| name.to_string_lossy().into_owned()).collect())
}

/// Establish a PC/SC context, failing early if the service is unavailable
pub fn establish_context() -> Result<Context, PcscError> {
    Context::establish(pcsc::Scope::User).map_err(PcscError::from)
}
