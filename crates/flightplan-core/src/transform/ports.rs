//! Port resolution.
//!
//! The platform forwards individual ports only, caps the count per
//! component, bounds the external port number, and uses port names as host
//! name fragments (so they are length-limited). Ranges are expanded
//! pointwise; over-long names get a stable hash-derived suffix.

use sha2::{Digest, Sha256};

use crate::errors::{FlightplanError, FlightplanResult};
use crate::model::definition::{Component, ServicePort};
use crate::model::manifest::PortSpec;

/// Platform limit on forwarded ports per component.
pub const MAX_PORT_COUNT: usize = 10;

/// Highest external port the platform will forward.
pub const EXTERNAL_PORT_UPPER_BOUND: u32 = 29999;

/// Port names longer than this cannot serve as host name fragments.
const MAX_PORT_NAME_LENGTH: usize = 15;

/// Attach a role's exposed ports to its component, expanding ranges and
/// enforcing the platform's structural limits.
pub fn attach_ports(component: &mut Component, ports: &[PortSpec]) -> FlightplanResult<()> {
    for port in ports {
        if port.external.is_range() {
            // The platform cannot forward ranges; expand pointwise, which
            // only works when both sides name the same range.
            if port.external != port.internal {
                return Err(FlightplanError::port_range_mismatch(&port.name));
            }
            let (first, last) = port.external.range_bounds().ok_or_else(|| {
                FlightplanError::invalid_manifest(format!(
                    "port {}: malformed range specifier",
                    port.name
                ))
            })?;
            for number in first..=last {
                let entry = service_port(
                    &component.name,
                    &format!("{}-{}", port.name, number),
                    &port.protocol,
                    number,
                    number,
                    port.public,
                )?;
                component.add_service_port(entry);
            }
        } else {
            let external = port_number(&port.external, &port.name)?;
            let internal = port_number(&port.internal, &port.name)?;
            let entry = service_port(
                &component.name,
                &port.name,
                &port.protocol,
                external,
                internal,
                port.public,
            )?;
            component.add_service_port(entry);
        }
    }

    if component.service_ports.len() > MAX_PORT_COUNT {
        return Err(FlightplanError::too_many_ports(
            component.service_ports.len(),
            &component.name,
            MAX_PORT_COUNT,
        ));
    }
    Ok(())
}

fn port_number(value: &crate::model::manifest::PortValue, name: &str) -> FlightplanResult<u32> {
    value.number().ok_or_else(|| {
        FlightplanError::invalid_manifest(format!("port {name}: not a port number"))
    })
}

fn service_port(
    component: &str,
    name: &str,
    protocol: &str,
    source_port: u32,
    target_port: u32,
    public: bool,
) -> FlightplanResult<ServicePort> {
    if source_port > EXTERNAL_PORT_UPPER_BOUND {
        return Err(FlightplanError::port_out_of_range(
            source_port,
            component,
            EXTERNAL_PORT_UPPER_BOUND,
        ));
    }
    Ok(ServicePort {
        name: shorten_name(name),
        protocol: protocol.to_string(),
        source_port,
        target_port,
        public,
    })
}

/// Shorten over-long port names to first 8 chars plus a 7-char suffix
/// derived from a digest of the full name: stable across runs, low
/// collision, still a valid host name fragment.
fn shorten_name(name: &str) -> String {
    // Character counts, not byte lengths: names are not guaranteed ASCII.
    if name.chars().count() <= MAX_PORT_NAME_LENGTH {
        return name.to_string();
    }
    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    let prefix: String = name.chars().take(8).collect();
    format!("{}{}", prefix, &digest[..7])
}
