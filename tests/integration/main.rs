mod editing_session;
mod helpers;
mod history_properties;
