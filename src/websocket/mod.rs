//! WebSocket Live Updates
//!
//! Streams a rendered dashboard to each connected page.
//!
//! ## Architecture
//!
//! - **SessionHub**: tracks live sessions (limits, counts, direct replies)
//! - **Handler**: upgrades the connection and runs one private session
//! - **Messages**: client and server message formats
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8000/ws');
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'update') {
//!     document.getElementById('temp').textContent = msg.view.current_temperature;
//!   }
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{HubConfig, HubError, SessionHandle, SessionHub, SessionId, SESSION_QUEUE_CAPACITY};
pub use messages::{ClientMessage, ServerMessage};
