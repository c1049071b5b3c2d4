use crate::client::TemperatureSource;
use crate::error::LookupError;
use crate::notify::Notify;

/// The dashboard's temperature lookup flow.
///
/// Mirrors what a user does on the dashboard: pick a city and a date, press
/// the button, and read exactly one message about the outcome.
#[derive(Debug)]
pub struct TemperatureLookup<'a> {
    source: &'a dyn TemperatureSource,
    notifier: &'a dyn Notify,
}

impl<'a> TemperatureLookup<'a> {
    pub fn new(source: &'a dyn TemperatureSource, notifier: &'a dyn Notify) -> Self {
        Self { source, notifier }
    }

    /// Look up the average temperature and report the outcome.
    ///
    /// Every invocation notifies exactly once: the validation message, the
    /// backend's own error text, or the formatted temperature line. While
    /// either selection is empty no request is issued.
    pub async fn run(&self, city: &str, date: &str) -> Result<f64, LookupError> {
        if city.is_empty() || date.is_empty() {
            let err = LookupError::MissingSelection;
            self.notifier.notify(&err.to_string());
            return Err(err);
        }

        match self.source.average_temperature(city, date).await {
            Ok(value) => {
                let message = format!("Temperature in {city} on {date}: {value}°C");
                self.notifier.notify(&message);
                Ok(value)
            }
            Err(err) => {
                self.notifier.notify(&err.to_string());
                Err(err.into())
            }
        }
    }
}
