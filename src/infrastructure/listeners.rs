use crate::infrastructure::PickerValue;

/// Receives the emitted value after every user-driven selection.
pub trait ChangeListener {
    fn on_change(&mut self, value: &PickerValue);
}

impl<F> ChangeListener for F
where
    F: FnMut(&PickerValue),
{
    fn on_change(&mut self, value: &PickerValue) {
        self(value)
    }
}

/// Form-binding side of the picker: at most one change listener and one
/// touched listener, both notified synchronously.
#[derive(Default)]
pub struct ValueAccessor {
    on_change: Option<Box<dyn ChangeListener>>,
    on_touched: Option<Box<dyn FnMut()>>,
}

impl ValueAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previously registered change listener.
    pub fn register_on_change<L>(&mut self, listener: L)
    where
        L: ChangeListener + 'static,
    {
        self.on_change = Some(Box::new(listener));
    }

    pub fn register_on_touched<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.on_touched = Some(Box::new(listener));
    }

    pub fn notify_change(&mut self, value: &PickerValue) {
        if let Some(listener) = self.on_change.as_mut() {
            listener.on_change(value);
        }
    }

    pub fn notify_touched(&mut self) {
        if let Some(listener) = self.on_touched.as_mut() {
            listener();
        }
    }
}
