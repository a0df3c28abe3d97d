use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use rosc::{OscMessage, OscPacket, OscType};

use super::OscTransport;
use crate::error::{BridgeError, BridgeResult};
use midimix_types::{InboundMessage, OscArg, OscTarget};

/// Upper bound on datagrams drained per poll, so a feedback burst cannot starve the surface.
const MAX_MESSAGES_PER_POLL: usize = 256;

const RECV_BUFFER_SIZE: usize = 8192;

/// UDP client talking to both OSC endpoints from a single socket.
///
/// Ardour replies to the port a message came from, so one socket receives
/// feedback for everything sent to either target.
pub struct OscClient {
    socket: UdpSocket,
    mixer_addr: SocketAddr,
    eq_addr: SocketAddr,
    buf: Vec<u8>,
}

impl OscClient {
    pub fn new(
        bind_addr: SocketAddr,
        mixer_addr: SocketAddr,
        eq_addr: SocketAddr,
        poll_timeout: Duration,
    ) -> BridgeResult<Self> {
        let socket = UdpSocket::bind(bind_addr).map_err(|e| {
            BridgeError::TransportUnavailable(format!("bind {}: {}", bind_addr, e))
        })?;
        socket
            .set_read_timeout(Some(poll_timeout))
            .map_err(|e| BridgeError::TransportUnavailable(e.to_string()))?;
        log::info!(
            target: "osc",
            "listening on {}, mixer {}, eq {}",
            socket.local_addr().map(|a| a.to_string()).unwrap_or_default(),
            mixer_addr,
            eq_addr
        );
        Ok(Self {
            socket,
            mixer_addr,
            eq_addr,
            buf: vec![0u8; RECV_BUFFER_SIZE],
        })
    }

    fn target_addr(&self, target: OscTarget) -> SocketAddr {
        match target {
            OscTarget::Mixer => self.mixer_addr,
            OscTarget::Equalizer => self.eq_addr,
        }
    }
}

impl OscTransport for OscClient {
    fn send(&mut self, target: OscTarget, addr: &str, args: &[OscArg]) -> BridgeResult {
        let msg = OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args: args.iter().map(to_osc_type).collect(),
        });
        let buf = rosc::encoder::encode(&msg)
            .map_err(|e| BridgeError::TransportSendFailure(format!("encode {}: {}", addr, e)))?;
        self.socket
            .send_to(&buf, self.target_addr(target))
            .map_err(|e| BridgeError::TransportSendFailure(format!("{}: {}", addr, e)))?;
        Ok(())
    }

    fn poll(&mut self) -> Vec<InboundMessage> {
        let mut messages = Vec::new();
        while messages.len() < MAX_MESSAGES_PER_POLL {
            match self.socket.recv(&mut self.buf) {
                Ok(n) => messages.extend(decode_packet(&self.buf[..n])),
                Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    break
                }
                Err(e) => {
                    log::warn!(target: "osc", "receive failed: {}", e);
                    break;
                }
            }
        }
        messages
    }
}

/// Decode one datagram, flattening bundles into their messages.
pub fn decode_packet(data: &[u8]) -> Vec<InboundMessage> {
    match rosc::decoder::decode_udp(data) {
        Ok((_, packet)) => {
            let mut out = Vec::new();
            flatten_packet(packet, &mut out);
            out
        }
        Err(e) => {
            log::warn!(target: "osc", "undecodable datagram ({} bytes): {:?}", data.len(), e);
            Vec::new()
        }
    }
}

fn flatten_packet(packet: OscPacket, out: &mut Vec<InboundMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(InboundMessage {
            args: msg.args.into_iter().filter_map(from_osc_type).collect(),
            addr: msg.addr,
        }),
        OscPacket::Bundle(bundle) => {
            for p in bundle.content {
                flatten_packet(p, out);
            }
        }
    }
}

fn to_osc_type(arg: &OscArg) -> OscType {
    match arg {
        OscArg::Int(v) => OscType::Int(*v),
        OscArg::Float(v) => OscType::Float(*v),
        OscArg::Str(s) => OscType::String(s.clone()),
    }
}

fn from_osc_type(arg: OscType) -> Option<OscArg> {
    match arg {
        OscType::Int(v) => Some(OscArg::Int(v)),
        OscType::Long(v) => Some(OscArg::Int(v as i32)),
        OscType::Float(v) => Some(OscArg::Float(v)),
        OscType::Double(v) => Some(OscArg::Float(v as f32)),
        OscType::Bool(v) => Some(OscArg::Int(v as i32)),
        OscType::String(s) => Some(OscArg::Str(s)),
        other => {
            log::trace!(target: "osc", "dropping unsupported argument {:?}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{OscBundle, OscTime};

    fn encode(packet: &OscPacket) -> Vec<u8> {
        rosc::encoder::encode(packet).unwrap()
    }

    #[test]
    fn decodes_single_message() {
        let data = encode(&OscPacket::Message(OscMessage {
            addr: "/strip/mute".to_string(),
            args: vec![OscType::Int(3), OscType::Float(1.0)],
        }));
        let messages = decode_packet(&data);
        assert_eq!(
            messages,
            vec![InboundMessage::new("/strip/mute", vec![OscArg::Int(3), OscArg::Float(1.0)])]
        );
    }

    #[test]
    fn flattens_nested_bundles() {
        let inner = OscPacket::Bundle(OscBundle {
            timetag: OscTime { seconds: 0, fractional: 1 },
            content: vec![OscPacket::Message(OscMessage {
                addr: "/strip/fader".to_string(),
                args: vec![OscType::Int(1), OscType::Float(0.5)],
            })],
        });
        let outer = OscPacket::Bundle(OscBundle {
            timetag: OscTime { seconds: 0, fractional: 1 },
            content: vec![
                OscPacket::Message(OscMessage {
                    addr: "/master/name".to_string(),
                    args: vec![OscType::String("Master".to_string())],
                }),
                inner,
            ],
        });
        let messages = decode_packet(&encode(&outer));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].addr, "/master/name");
        assert_eq!(messages[1].args, vec![OscArg::Int(1), OscArg::Float(0.5)]);
    }

    #[test]
    fn garbage_decodes_to_nothing() {
        assert!(decode_packet(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn sends_to_target_and_receives_replies() {
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let mut client = OscClient::new(
            "127.0.0.1:0".parse().unwrap(),
            peer_addr,
            peer_addr,
            Duration::from_millis(200),
        )
        .unwrap();
        client
            .send(OscTarget::Mixer, "/strip/mute", &[OscArg::Int(2), OscArg::Int(1)])
            .unwrap();

        let mut buf = [0u8; 1024];
        let (n, from) = peer.recv_from(&mut buf).unwrap();
        let sent = decode_packet(&buf[..n]);
        assert_eq!(sent[0].addr, "/strip/mute");
        assert_eq!(sent[0].args, vec![OscArg::Int(2), OscArg::Int(1)]);

        let reply = encode(&OscPacket::Message(OscMessage {
            addr: "/strip/recenable".to_string(),
            args: vec![OscType::Int(2), OscType::Float(1.0)],
        }));
        peer.send_to(&reply, from).unwrap();

        let received = client.poll();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].addr, "/strip/recenable");
    }

    #[test]
    fn poll_returns_empty_after_timeout() {
        let mut client = OscClient::new(
            "127.0.0.1:0".parse().unwrap(),
            "127.0.0.1:9".parse().unwrap(),
            "127.0.0.1:9".parse().unwrap(),
            Duration::from_millis(1),
        )
        .unwrap();
        assert!(client.poll().is_empty());
    }
}
