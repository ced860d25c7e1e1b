/// Contract a user type must satisfy to run under the scheduler.
///
/// The scheduler never inspects `Msg`, `State` or `Reply` — it only moves
/// values produced and consumed by `on_receive` around. `on_receive` is
/// pure from the scheduler's perspective: it is handed the message and the
/// actor's current state, and returns the next state plus a reply. Any
/// side effects the user performs inside it (including ones that block for
/// a while) are the user's business; the scheduler only charges reductions
/// for the wall-clock time they take.
pub trait Actor: Send + Sync + 'static {
    /// Message type this actor's mailbox carries.
    type Msg: Send + 'static;
    /// Private state threaded through successive `on_receive` calls.
    type State: Clone + Send + 'static;
    /// Value handed to the reply sink after a message is processed.
    type Reply: Send + 'static;

    /// Handle one message against the current state, producing the next
    /// state and a reply.
    ///
    /// May panic; the executor catches it, logs it, and keeps `state`
    /// unchanged (see the failure semantics in [`crate::executor`]).
    fn on_receive(&self, msg: Self::Msg, state: Self::State) -> (Self::State, Self::Reply);
}
