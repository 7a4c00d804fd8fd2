//! ROS 2 interface for Beacon
//!
//! Enabled with the `ros` feature. This module handles:
//! - Publishing motor directives as `geometry_msgs/Twist`
//! - Publishing status transitions as `std_msgs/String`

mod publisher;

use crossbeam_channel::Receiver;
use log::{error, info};
use r2r::geometry_msgs::msg::Twist;
use r2r::std_msgs::msg::String as StringMsg;
use r2r::{Context, Node};

use crate::config::RosSettings;
use crate::core::StatusTransition;
use crate::navigation::{Actuator, Command, NavigationError};
use crate::{BeaconError, Result};

pub use publisher::Publisher;

impl From<r2r::Error> for BeaconError {
    fn from(e: r2r::Error) -> Self {
        BeaconError::Ros(e.to_string())
    }
}

/// Owns the ROS context and node the publishers are created on
pub struct RosInterface {
    node: Node,
    _context: Context,
    settings: RosSettings,
}

impl RosInterface {
    /// Create a new ROS interface
    pub fn new(settings: &RosSettings) -> Result<Self> {
        let context = Context::create()?;
        let node = Node::create(context.clone(), &settings.node_name, "")?;
        info!("ROS 2 node '{}' created", settings.node_name);

        Ok(RosInterface {
            node,
            _context: context,
            settings: settings.clone(),
        })
    }

    /// Builds an actuator publishing on the configured velocity topic
    pub fn actuator(&mut self) -> Result<RosActuator> {
        let publisher = Publisher::new(&mut self.node, &self.settings.cmd_vel_topic)?;
        info!("Publishing motor commands to {}", publisher.topic());
        Ok(RosActuator {
            publisher,
            linear_speed: self.settings.linear_speed,
            angular_speed: self.settings.angular_speed,
        })
    }

    /// Builds a publisher for status transitions
    pub fn status_publisher(&mut self) -> Result<StatusPublisher> {
        let publisher = Publisher::new(&mut self.node, &self.settings.status_topic)?;
        info!("Publishing status transitions to {}", publisher.topic());
        Ok(StatusPublisher { publisher })
    }
}

/// Actuator that turns directives into velocity commands
pub struct RosActuator {
    publisher: Publisher<Twist>,
    linear_speed: f64,
    angular_speed: f64,
}

impl RosActuator {
    fn twist(&self, command: Command) -> Twist {
        let mut twist = Twist::default();
        match command {
            Command::TurnLeft => twist.angular.z = self.angular_speed,
            Command::TurnRight => twist.angular.z = -self.angular_speed,
            Command::MoveForward => twist.linear.x = self.linear_speed,
            Command::Stop => {}
        }
        twist
    }

    fn send(&mut self, command: Command) -> std::result::Result<(), NavigationError> {
        let twist = self.twist(command);
        self.publisher
            .publish(&twist)
            .map_err(|e| NavigationError::Actuator(e.to_string()))
    }
}

impl Actuator for RosActuator {
    fn turn_left(&mut self) -> std::result::Result<(), NavigationError> {
        self.send(Command::TurnLeft)
    }

    fn turn_right(&mut self) -> std::result::Result<(), NavigationError> {
        self.send(Command::TurnRight)
    }

    fn move_forward(&mut self) -> std::result::Result<(), NavigationError> {
        self.send(Command::MoveForward)
    }

    fn stop(&mut self) -> std::result::Result<(), NavigationError> {
        self.send(Command::Stop)
    }
}

/// Publishes each status transition as its wire name
pub struct StatusPublisher {
    publisher: Publisher<StringMsg>,
}

impl StatusPublisher {
    /// Publishes a single transition
    pub fn publish(&self, transition: &StatusTransition) -> Result<()> {
        let msg = StringMsg {
            data: transition.to.as_str().to_string(),
        };
        self.publisher.publish(&msg)?;
        Ok(())
    }

    /// Forwards transitions until the controller side hangs up
    pub fn forward(self, transitions: Receiver<StatusTransition>) {
        for transition in transitions {
            if let Err(e) = self.publish(&transition) {
                error!("Failed to publish status {}: {}", transition.to, e);
            }
        }
    }
}
