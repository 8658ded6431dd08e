/// Messages driving the augmenter.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    /// Look for file candidates and add the missing buttons.
    Scan,
    /// The listener delay elapsed.
    AttachListener,
    /// A button was clicked, carrying its raw `file-id` attribute.
    ButtonClicked(String),
    CloseDialog,
    /// The host page changed under us.
    PageMutated,
}
