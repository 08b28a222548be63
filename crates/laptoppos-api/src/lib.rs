// laptoppos-api: wire protocol and transports for the LaptopPOS live-sync channel

pub mod endpoint;
pub mod error;
pub mod message;
pub mod rest;
pub mod websocket;

pub use endpoint::{LIVE_PATH, live_endpoint};
pub use error::Error;
pub use message::{Action, AuthMessage, InboundMessage, MessageType};
pub use rest::QueryClient;
pub use websocket::{Connector, Frame, Link, TungsteniteConnector, TungsteniteLink};
