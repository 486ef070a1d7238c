use std::{
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::error::Error;

type MessageBuffer<T> = Arc<Mutex<Option<T>>>;

/// Keeps the latest message received on a topic.
pub struct SubscriberHandler<T> {
    topic: String,
    buffer: MessageBuffer<T>,
    _subscriber: rosrust::Subscriber,
}

impl<T> SubscriberHandler<T>
where
    T: rosrust::Message,
{
    pub fn new(topic: &str, queue_size: usize) -> Result<Self, Error> {
        let buffer: MessageBuffer<T> = Arc::new(Mutex::new(None));
        let buffer_for_callback = buffer.clone();
        let _subscriber = rosrust::subscribe(topic, queue_size, move |message: T| {
            if let Ok(mut buffer) = buffer_for_callback.lock() {
                buffer.replace(message);
            }
        })
        .map_err(|e| Error::Subscribe {
            topic: topic.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Self {
            topic: topic.to_string(),
            buffer,
            _subscriber,
        })
    }

    pub fn get(&self) -> Result<Option<T>, Error> {
        Ok(self
            .buffer
            .lock()
            .map_err(|_| Error::Lock(self.topic.clone()))?
            .clone())
    }
}

impl<T> std::fmt::Debug for SubscriberHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberHandler")
            .field("topic", &self.topic)
            .finish()
    }
}

pub fn convert_system_time_to_ros_time(time: &SystemTime) -> rosrust::Time {
    let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    rosrust::Time {
        sec: since_epoch.as_secs() as u32,
        nsec: since_epoch.subsec_nanos(),
    }
}

pub fn convert_ros_time_to_system_time(time: &rosrust::Time) -> SystemTime {
    UNIX_EPOCH + Duration::new(u64::from(time.sec), time.nsec)
}
