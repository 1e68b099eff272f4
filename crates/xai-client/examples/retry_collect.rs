use futures::TryStreamExt as _;
use xai_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), XaiError> {
    let client = XaiClient::from_env()?;
    let policy = RetryPolicy::default();

    let events: Vec<StreamEvent> = policy
        .run(|| async {
            let stream = client
                .stream_chat("Answer briefly.", &[Message::user("Say hello")])
                .await?;
            stream.try_collect().await
        })
        .await?;

    let text: String = events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::TextDelta { text } => Some(text.as_str()),
            StreamEvent::UsageTotal { .. } => None,
        })
        .collect();
    println!("{text}");
    Ok(())
}
