// CarePlus Engine — headless controllers for the care portal front-end
// Registration flow, chat sessions, and canned-reply resolution as plain
// in-process state machines; rendering, transport, and routing stay with
// the embedding UI behind the collaborator traits.

pub mod auth;
pub mod chat;
pub mod registration;
pub mod replies;
pub mod speech;
