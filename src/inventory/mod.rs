//! Types and plumbing for the inventory side of the bridge: the event
//! payloads it delivers and the registrar that keeps our webhook subscribed.

pub mod events;
pub mod registrar;
