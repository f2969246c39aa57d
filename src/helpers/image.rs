//! Image URL helpers

/// Size an image URL for a card of `max_width` x `max_height`.
///
/// Hosted images from services with URL-based resizing get sizing
/// parameters; everything else, including site-local paths, is returned
/// unchanged.
pub fn optimize_image_size(image_path: &str, max_width: u32, max_height: u32) -> String {
    if !image_path.contains("://") {
        return image_path.to_string();
    }

    let already_sized = ["?w=", "&w=", "?width=", "&width="]
        .iter()
        .any(|param| image_path.contains(param));
    if already_sized {
        return image_path.to_string();
    }

    if image_path.contains("unsplash.com") {
        let separator = if image_path.contains('?') { '&' } else { '?' };
        return format!(
            "{}{}w={}&h={}&fit=crop",
            image_path, separator, max_width, max_height
        );
    }

    if image_path.contains("cloudinary.com") {
        return image_path.replacen(
            "/upload/",
            &format!("/upload/c_fill,w_{},h_{}/", max_width, max_height),
            1,
        );
    }

    image_path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_paths_unchanged() {
        assert_eq!(
            optimize_image_size("/blog/posts/images/a.png", 800, 600),
            "/blog/posts/images/a.png"
        );
    }

    #[test]
    fn test_unsplash() {
        assert_eq!(
            optimize_image_size("https://images.unsplash.com/photo-1", 800, 600),
            "https://images.unsplash.com/photo-1?w=800&h=600&fit=crop"
        );
        assert_eq!(
            optimize_image_size("https://images.unsplash.com/photo-1?q=80", 400, 300),
            "https://images.unsplash.com/photo-1?q=80&w=400&h=300&fit=crop"
        );
    }

    #[test]
    fn test_already_sized() {
        let url = "https://images.unsplash.com/photo-1?w=1200";
        assert_eq!(optimize_image_size(url, 800, 600), url);
    }

    #[test]
    fn test_cloudinary() {
        assert_eq!(
            optimize_image_size(
                "https://res.cloudinary.com/demo/image/upload/sample.jpg",
                800,
                600
            ),
            "https://res.cloudinary.com/demo/image/upload/c_fill,w_800,h_600/sample.jpg"
        );
    }

    #[test]
    fn test_other_hosts_unchanged() {
        let url = "https://cdn.example.com/a.png";
        assert_eq!(optimize_image_size(url, 800, 600), url);
    }
}
