use merchantdesk_core::Aggregate;

/// Execute an aggregate command deterministically (no IO, no async).
///
/// 1. **Decide**: `aggregate.handle(command)` yields events without mutating.
/// 2. **Evolve**: each event is applied in order.
///
/// On error nothing is applied, so a rejected command leaves the aggregate untouched.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    tracing::trace!(applied = events.len(), version = aggregate.version(), "command executed");
    Ok(events)
}
