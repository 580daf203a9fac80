use std::io;

use contactosms::{
    CancellationToken, ClientOptions, ContactoSmsClient, GroupShortName, MessageText, RetryPolicy,
    RetryingClient, SendToGroups, block_on,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let group = std::env::var("CONTACTOSMS_GROUP").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CONTACTOSMS_GROUP environment variable is required",
        )
    })?;

    let options = ClientOptions::from_env()?;
    let client = RetryingClient::new(
        ContactoSmsClient::from_options(&options)?,
        RetryPolicy::from_options(&options.retry)?,
    );
    let request = SendToGroups::new(
        vec![GroupShortName::new(group)?],
        MessageText::new("Hello from a synchronous caller.")?,
    )?;

    // Sends are never repeated; the policy only covers the follow-up listing.
    let cancel = CancellationToken::new();
    let response = block_on(client.messages().send_to_groups(&request, &cancel))??;
    println!(
        "http: {} {}, error_code: {}, data: {:?}",
        response.http_code, response.http_description, response.error_code, response.data
    );

    let scheduled = block_on(client.messages().scheduled(&cancel))??;
    println!(
        "scheduled: {} entries",
        scheduled.data.map(|items| items.len()).unwrap_or_default()
    );

    Ok(())
}
