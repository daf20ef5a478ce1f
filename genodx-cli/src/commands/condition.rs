//! Condition command implementation - maintain the list of screened conditions

use genodx_core::Condition;

use super::Session;
use crate::error::{CliError, CliResult};
use crate::ConditionCommand;

pub fn execute(session: &mut Session, command: ConditionCommand) -> CliResult<()> {
    match command {
        ConditionCommand::Add { name, seq, chromosome } => {
            add(session, Condition::new(name, seq.trim(), chromosome))
        }
        ConditionCommand::Remove { name } => remove(session, &name),
        ConditionCommand::List => {
            list(session);
            Ok(())
        }
    }
}

fn add(session: &mut Session, condition: Condition) -> CliResult<()> {
    if condition.sequence.is_empty() {
        return Err(CliError::validation("A condition needs a non-empty mutated sequence"));
    }

    let name = condition.name.clone();
    if !session.clinic.add_condition(condition) {
        return Err(CliError::validation(format!(
            "A condition named {name} is already registered"
        )));
    }

    session.save()?;
    println!("Registered condition {name}");
    Ok(())
}

fn remove(session: &mut Session, name: &str) -> CliResult<()> {
    if !session.clinic.remove_condition(name) {
        return Err(CliError::not_found("condition", name));
    }

    session.save()?;
    println!("Removed condition {name}");
    Ok(())
}

fn list(session: &Session) {
    let conditions = session.clinic.conditions();
    if conditions.is_empty() {
        println!("No conditions registered");
        return;
    }

    for condition in conditions.iter() {
        println!(
            "{} (chromosome {}): {}",
            condition.name, condition.chromosome, condition.sequence
        );
    }
}
