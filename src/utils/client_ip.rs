use actix_web::HttpRequest;

/// 兑奖时记录的客户端地址
/// trust_proxy 为 true 时优先取 Forwarded / X-Forwarded-For
pub fn client_ip(req: &HttpRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        let info = req.connection_info();
        if let Some(addr) = info.realip_remote_addr() {
            return strip_port(addr).to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn strip_port(addr: &str) -> &str {
    // [v6]:port
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    // v4:port（纯 IPv6 含多个冒号，保持原样）
    match addr.split_once(':') {
        Some((host, port)) if !port.contains(':') => host,
        _ => addr,
    }
}
