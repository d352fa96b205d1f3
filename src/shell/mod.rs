mod errors;
mod render;
mod repl;
mod session;

pub use errors::{NO_MOVEMENTS_MESSAGE, SessionError};
pub use render::{OFFLINE_BANNER, render_connection, render_listing, render_statement};
pub use repl::{Command, Shell};
pub use session::{BalanceDraft, FetchOutcome, FetchTicket, Session, load_statement};
