//! Route labels for spans and metrics.

use uuid::Uuid;

/// The request path with identifier segments collapsed, so every cart item or order
/// shares one label instead of creating a series per id.
pub(super) fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_collapse_into_one_route() {
        assert_eq!(
            route_label("/cart/items/01890a5d-ac96-774b-bcce-b302099a8057"),
            "/cart/items/{id}"
        );
        assert_eq!(
            route_label("/admin/orders/01890a5d-ac96-774b-bcce-b302099a8057/status"),
            "/admin/orders/{id}/status"
        );
    }

    #[test]
    fn static_paths_are_kept() {
        assert_eq!(route_label("/"), "/");
        assert_eq!(route_label("/products"), "/products");
        assert_eq!(
            route_label("/admin/orders/not-a-uuid/status"),
            "/admin/orders/not-a-uuid/status"
        );
    }
}
