use personality_core::QUESTIONS;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&QUESTIONS[..])?);
        return Ok(());
    }

    for q in QUESTIONS.iter() {
        let keyed = if q.reverse { "reverse" } else { "" };
        println!("{:<3} {:<18} {}", q.id, q.trait_code.label(), keyed);
    }
    Ok(())
}
