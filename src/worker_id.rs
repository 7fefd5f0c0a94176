//! Worker-identifier provider strategies.
//!
//! Each provider is a plain `fn() -> Result<u16, BoxDynError>` suitable for
//! [`Builder::worker_id`]. Distinctness across a fleet is the caller's
//! responsibility; these strategies only read environment or network
//! configuration.
//!
//! [`Builder::worker_id`]: crate::Builder::worker_id

use crate::error::BoxDynError;
use std::env;
use std::net::Ipv4Addr;

/// Environment variable holding the host IP, as exposed by e.g. a
/// Kubernetes downward-API field.
pub const ENV_HOST_IP: &str = "MY_HOST_IP";
/// Environment variable holding the pod name. Requires StatefulSet naming
/// (`my-pod-<ordinal>`).
pub const ENV_POD_NAME: &str = "MY_POD_NAME";

/// Lower 16 bits of the IPv4 address passed via `MY_HOST_IP`.
pub fn env_ip_worker_id() -> Result<u16, BoxDynError> {
    let ip_str =
        env::var(ENV_HOST_IP).map_err(|_| format!("'{ENV_HOST_IP}' environment variable not set"))?;
    let ip: Ipv4Addr = ip_str.parse().map_err(|_| "invalid IP")?;
    Ok(lower16(ip))
}

/// Trailing ordinal of the pod name passed via `MY_POD_NAME`.
pub fn pod_ordinal_worker_id() -> Result<u16, BoxDynError> {
    let pod = env::var(ENV_POD_NAME)
        .map_err(|_| format!("'{ENV_POD_NAME}' environment variable not set"))?;
    let ordinal = pod.rsplit('-').next().unwrap_or(&pod);
    let id: u16 = ordinal
        .parse()
        .map_err(|_| format!("pod name `{pod}` does not end in a 16-bit ordinal"))?;
    Ok(id)
}

/// Lower 16 bits of a private IPv4 address found on a local interface.
#[cfg(feature = "ip-fallback")]
pub fn lower16_bit_private_ip() -> Result<u16, BoxDynError> {
    let ip = private_ipv4().ok_or(crate::error::Error::NoPrivateIPv4)?;
    Ok(lower16(ip))
}

fn lower16(ip: Ipv4Addr) -> u16 {
    let octets = ip.octets();
    u16::from(octets[2]) << 8 | u16::from(octets[3])
}

#[cfg(feature = "ip-fallback")]
fn private_ipv4() -> Option<Ipv4Addr> {
    use std::net::IpAddr;

    pnet_datalink::interfaces()
        .iter()
        .filter(|iface| iface.is_up() && !iface.is_loopback() && !iface.ips.is_empty())
        .flat_map(|iface| iface.ips.iter())
        .find_map(|network| match network.ip() {
            IpAddr::V4(ipv4) if is_private_ipv4(&ipv4) => Some(ipv4),
            _ => None,
        })
}

#[cfg(feature = "ip-fallback")]
fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();
    octets[0] == 10
        || (octets[0] == 172 && (16..=31).contains(&octets[1]))
        || (octets[0] == 192 && octets[1] == 168)
}
