use serde::{Deserialize, Serialize};
use todo_api::signing::{Signed, TokenSigner, salted_digest};

#[derive(Debug, Serialize, Deserialize)]
struct Data {
    id: u32,
    name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let secret = std::env::var("SIGNING_SECRET").unwrap_or_else(|_| "123abc".to_string());

    let msg = "I am terminator 4";
    println!("msg: {}", msg);
    println!("hash: {}", salted_digest(msg, &secret));

    let signer = TokenSigner::new(secret);
    let data = Data { id: 10, name: "Terrence".to_string() };

    let token = signer.sign(&data)?;
    let decoded: Signed<Data> = signer.verify(&token)?;

    println!("{}", token);
    println!("decoded {:?}", decoded);
    println!("decoded:id {}", decoded.claims.id);

    Ok(())
}
