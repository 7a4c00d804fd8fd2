use r2r::QosProfile;

// Generic ROS2 Publisher wrapper
pub struct Publisher<T>
where
    T: r2r::WrappedTypesupport,
{
    inner: r2r::Publisher<T>,
    topic: String,
}

impl<T> Publisher<T>
where
    T: r2r::WrappedTypesupport + 'static,
{
    // Create a new publisher on the given topic with default QoS
    pub fn new(node: &mut r2r::Node, topic: &str) -> Result<Self, r2r::Error> {
        let inner = node.create_publisher::<T>(topic, QosProfile::default())?;
        Ok(Publisher {
            inner,
            topic: topic.to_string(),
        })
    }

    // Publish a message to the topic
    pub fn publish(&self, message: &T) -> Result<(), r2r::Error> {
        self.inner.publish(message)
    }

    // Topic this publisher writes to
    pub fn topic(&self) -> &str {
        &self.topic
    }
}
