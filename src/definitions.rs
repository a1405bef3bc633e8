//! The platform's error code registry.
//!
//! # Conventions
//!
//! - Names are SCREAMING_SNAKE_CASE and never change once released; message
//!   catalogs are keyed on them.
//! - [`ErrorCode::InternalError`] is the escape hatch for failures that have
//!   no better code. Reaching for it signals a modeling gap: add a code here
//!   instead whenever the condition is expected to recur.
//! - Codes are grouped by the subsystem that typically raises them, but the
//!   grouping carries no semantics.

use crate::define_error_codes;

define_error_codes! {
    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------
    /// A component configuration is invalid as a whole.
    ConfigurationError => "CONFIGURATION_ERROR",
    /// A configuration attribute is not defined for the component.
    ConfigurationAttributeUndefined => "CONFIGURATION_ATTRIBUTE_UNDEFINED",
    /// A configuration attribute has an invalid value.
    ConfigurationAttributeInvalid => "CONFIGURATION_ATTRIBUTE_INVALID",
    /// A required configuration attribute is missing.
    ConfigurationRequiredAttributeMissing => "CONFIGURATION_REQUIRED_ATTRIBUTE_MISSING",
    /// Applying a configuration update failed.
    ConfigurationUpdate => "CONFIGURATION_UPDATE",
    /// Rolling back to a previous configuration failed.
    ConfigurationRollback => "CONFIGURATION_ROLLBACK",
    /// The requested configuration snapshot does not exist.
    ConfigurationSnapshotNotFound => "CONFIGURATION_SNAPSHOT_NOT_FOUND",
    /// Listing configuration snapshots failed.
    ConfigurationSnapshotListing => "CONFIGURATION_SNAPSHOT_LISTING",
    /// Loading a configuration snapshot failed.
    ConfigurationSnapshotLoading => "CONFIGURATION_SNAPSHOT_LOADING",
    /// Taking a configuration snapshot failed.
    ConfigurationSnapshotTaking => "CONFIGURATION_SNAPSHOT_TAKING",

    // -------------------------------------------------------------------------
    // Generic
    // -------------------------------------------------------------------------
    /// Unexpected failure with no more specific code.
    InternalError => "INTERNAL_ERROR",
    /// Some, but not all, parts of an operation succeeded.
    PartialSuccess => "PARTIAL_SUCCESS",
    /// The operation is not supported by this implementation.
    OperationNotSupported => "OPERATION_NOT_SUPPORTED",
    /// A caller-supplied parameter is invalid.
    InvalidParameter => "INVALID_PARAMETER",
    /// The operation was denied by a security policy.
    SecurityException => "SECURITY_EXCEPTION",
    /// The requested resource does not exist.
    NotFound => "NOT_FOUND",
    /// The request is malformed.
    BadRequest => "BAD_REQUEST",
    /// A required service is not available.
    ServiceUnavailable => "SERVICE_UNAVAILABLE",

    // -------------------------------------------------------------------------
    // Connectivity
    // -------------------------------------------------------------------------
    /// The operation requires a connection that is not established.
    NotConnected => "NOT_CONNECTED",
    /// The operation did not complete in time.
    TimedOut => "TIMED_OUT",
    /// Establishing a connection failed.
    ConnectionFailed => "CONNECTION_FAILED",
    /// Tearing down a connection failed.
    DisconnectionFailed => "DISCONNECTION_FAILED",
    /// Subscribing to a topic failed.
    SubscriptionFailed => "SUBSCRIPTION_FAILED",
    /// Too many messages are awaiting acknowledgement.
    TooManyInflightMessages => "TOO_MANY_INFLIGHT_MESSAGES",
    /// No connection could be obtained from the pool or factory.
    UnableToObtainConnection => "UNABLE_TO_OBTAIN_CONNECTION",

    // -------------------------------------------------------------------------
    // Devices and ports
    // -------------------------------------------------------------------------
    /// A serial port configuration is invalid.
    SerialPortInvalidConfiguration => "SERIAL_PORT_INVALID_CONFIGURATION",
    /// The serial port does not exist.
    SerialPortNotExisting => "SERIAL_PORT_NOT_EXISTING",
    /// The port is already in use.
    PortInUse => "PORT_IN_USE",
    /// The device is not available.
    UnavailableDevice => "UNAVAILABLE_DEVICE",
    /// The device has been closed.
    ClosedDevice => "CLOSED_DEVICE",
    /// A GPIO operation failed.
    GpioException => "GPIO_EXCEPTION",

    // -------------------------------------------------------------------------
    // Storage and encoding
    // -------------------------------------------------------------------------
    /// The persistent store reported a failure.
    StoreError => "STORE_ERROR",
    /// Encoding a payload failed.
    EncodeError => "ENCODE_ERROR",
    /// Decoding a payload failed.
    DecodeError => "DECODE_ERROR",
    /// A metric value is invalid.
    InvalidMetricException => "INVALID_METRIC_EXCEPTION",
    /// A message is malformed.
    InvalidMessageException => "INVALID_MESSAGE_EXCEPTION",
    /// An I/O operation failed.
    IoError => "IO_ERROR",

    // -------------------------------------------------------------------------
    // Processes and deployment
    // -------------------------------------------------------------------------
    /// An operating system command returned an error.
    OsCommandError => "OS_COMMAND_ERROR",
    /// Executing an external process failed.
    ProcessExecutionError => "PROCESS_EXECUTION_ERROR",
    /// Installing a deployment package failed.
    DeploymentInstallFailed => "DEPLOYMENT_INSTALL_FAILED",
    /// Uninstalling a deployment package failed.
    DeploymentUninstallFailed => "DEPLOYMENT_UNINSTALL_FAILED",
}

impl ErrorCode {
    /// Whether this is the generic [`ErrorCode::InternalError`] escape hatch.
    #[inline]
    pub const fn is_internal(self) -> bool {
        matches!(self, ErrorCode::InternalError)
    }
}
