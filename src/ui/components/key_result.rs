/// What a component did with a key event.
///
/// Views offer each key to their overlays and components in turn and stop at
/// the first one that does not answer `NotHandled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, and the parent has to react to `T`
  Event(T),
  /// Not consumed, offer it to the next handler
  NotHandled,
}
