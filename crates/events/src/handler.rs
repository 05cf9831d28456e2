use loyalty_core::Aggregate;

/// Run `command` against `aggregate` and return the events it produced.
///
/// Events are applied in order only after `handle` accepted the command; on
/// rejection the aggregate is returned untouched.
pub fn execute<A: Aggregate>(
    aggregate: &mut A,
    command: &A::Command,
) -> Result<Vec<A::Event>, A::Error> {
    let events = aggregate.handle(command)?;
    events.iter().for_each(|event| aggregate.apply(event));
    Ok(events)
}
