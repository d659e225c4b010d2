//! Splitting a byte stream into consecutive tnetstring frames.
//!
//! Run with: cargo run --example framing

use serde::{Deserialize, Serialize};
use serde_tnetstring::{pop, render, tnet, Deserializer};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
enum Message {
    Ping,
    Say { from: String, text: String },
    Bye(u32),
}

fn main() -> Result<(), Box<dyn Error>> {
    // Frames written back to back, as they would arrive on a socket.
    let mut wire = Vec::new();
    for message in [
        Message::Ping,
        Message::Say {
            from: "alice".to_string(),
            text: "hello".to_string(),
        },
        Message::Bye(0),
    ] {
        wire.extend(serde_tnetstring::to_vec(&message)?);
    }
    println!("wire: {}\n", String::from_utf8_lossy(&wire));

    for message in Deserializer::from_slice(&wire).into_iter::<Message>() {
        println!("typed frame: {:?}", message?);
    }

    // The same stream through the dynamic model: pop hands back the rest.
    let mut rest: &[u8] = &wire;
    while !rest.is_empty() {
        let (value, tail) = pop(rest)?;
        println!("dynamic frame ({} bytes): {:?}", rest.len() - tail.len(), value);
        rest = tail;
    }

    // A frame cut short is reported, not guessed at.
    let frame = render(&tnet!({ "seq": 7, "body": "partial" }))?;
    let err = pop(&frame[..frame.len() - 3]).unwrap_err();
    println!("\ntruncated frame: {}", err);

    Ok(())
}
