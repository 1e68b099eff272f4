use futures::StreamExt as _;
use xai_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), XaiError> {
    let client = XaiClient::from_env()?;

    let mut stream = client
        .stream_chat(
            "You are a concise assistant. Reply with a short sentence.",
            &[Message::user("Stream a greeting.")],
        )
        .await?;

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::TextDelta { text } => print!("{text}"),
            StreamEvent::UsageTotal {
                input_tokens,
                output_tokens,
            } => eprintln!("\n[usage] input_tokens={input_tokens} output_tokens={output_tokens}"),
        }
    }
    println!();
    Ok(())
}
