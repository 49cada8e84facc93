use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use jwt_simple::prelude::*;
use serde_json::{Map, Value};

use crate::prelude::*;

pub const HTU: &str = "https://server.example.com/token";

pub fn htu() -> url::Url {
    url::Url::parse(HTU).unwrap()
}

pub fn now() -> UnixTimeStamp {
    Clock::now_since_epoch()
}

pub fn default_claims() -> JWTClaims<ProofClaims> {
    ProofClaims::new(Htm::Post, &htu()).into_jwt_claims(None)
}

pub fn jwt_header(token: &str) -> Map<String, Value> {
    jwt_part(token, 0)
}

pub fn jwt_claims(token: &str) -> Map<String, Value> {
    jwt_part(token, 1)
}

fn jwt_part(token: &str, part: usize) -> Map<String, Value> {
    let part = token.split('.').nth(part).unwrap();
    let part = BASE64_URL_SAFE_NO_PAD.decode(part).unwrap();
    serde_json::from_slice::<Value>(&part)
        .unwrap()
        .as_object()
        .unwrap()
        .to_owned()
}
