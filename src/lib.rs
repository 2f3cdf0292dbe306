extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Grammar, GrammarError};

fn error_to_json(e: GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    let g = crate::Grammar::parse(grammar);
    match g.and_then(|g| g.calculate_nullable_first_follow().map(|nff| (g, nff))) {
        Ok((g, nff)) => g.to_non_terminal_output_vec(&nff).to_json(),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn left_factor_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => g.left_factor().to_production_output_vec().to_json(),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn eliminate_left_recursion_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => g
            .eliminate_left_recursion()
            .to_production_output_vec()
            .to_json(),
        Err(e) => error_to_json(e),
    }
}
