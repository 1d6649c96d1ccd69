const APP_NAME: &str = "Signpad";

pub fn send(body: impl Into<String>) {
    let body = body.into();
    if let Err(err) = notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary("Signature captured")
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}

pub fn submission_saved(signer: &str, destination: Option<&std::path::Path>) {
    let body = match destination {
        Some(path) => format!("Signed by {signer}. Saved to {}", path.display()),
        None => format!("Signed by {signer}."),
    };
    send(body);
}
