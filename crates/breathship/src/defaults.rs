//! Built-in site data.
//!
//! This is the one dataset used to seed an empty local store and to stand in
//! for any collection that cannot be read. The content table covers every key
//! a page looks up.

use crate::model::{
    Blog, ContentField, ContentMap, FieldType, Session, SessionTag, Testimonial, VisibilityFlag,
};

use FieldType::{Image, Text, Textarea};

/// `(section, field_name, field_value, field_type)`, ordered by section.
const CONTENT: &[(&str, &str, &str, FieldType)] = &[
    // Header
    ("header", "header_company_name", "Breathship", Text),
    ("header", "header_logo_alt", "Breathship Logo", Text),
    // Hero
    ("hero", "hero_text", "Breathe. Heal. Transform.", Text),
    (
        "hero",
        "hero_subtitle",
        "Discover the transformative power of conscious breathing. Experience deep healing, stress relief, and inner peace through ancient wisdom and modern science.",
        Textarea,
    ),
    ("hero", "hero_badge_text", "Transform Your Life Through Conscious Breathing", Text),
    (
        "hero",
        "hero_background_image",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=1920&h=1080&fit=crop",
        Image,
    ),
    ("hero", "hero_cta_primary", "Start Your Journey", Text),
    ("hero", "hero_cta_secondary", "Watch Introduction", Text),
    ("hero", "hero_stats_clients", "500+", Text),
    ("hero", "hero_stats_clients_text", "Clients Transformed", Text),
    ("hero", "hero_stats_experience", "5+", Text),
    ("hero", "hero_stats_experience_text", "Years Experience", Text),
    ("hero", "hero_stats_rating", "4.9/5", Text),
    ("hero", "hero_stats_rating_text", "Rating", Text),
    ("hero", "hero_trust_1", "Certified Breathwork Facilitator", Text),
    ("hero", "hero_trust_2", "Evidence-Based Techniques", Text),
    ("hero", "hero_trust_3", "Safe & Supportive Environment", Text),
    // Quote
    ("quote", "main_quote", "Breath is the bridge between body and mind.", Text),
    // About me
    ("about_me", "about_me_title", "About Me", Text),
    ("about_me", "about_me_subtitle", "Your Journey to Inner Peace Starts Here", Text),
    (
        "about_me",
        "about_me",
        "I am a certified breathwork facilitator with over 5 years of experience helping people find peace and healing through conscious breathing.",
        Textarea,
    ),
    (
        "about_me",
        "about_me_description",
        "I am a certified breathwork facilitator with over 5 years of experience helping people transform their lives through conscious breathing. My approach combines ancient wisdom with modern science to create powerful healing experiences.",
        Textarea,
    ),
    (
        "about_me",
        "about_me_image",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=600&h=800&fit=crop",
        Image,
    ),
    // About Breathship
    ("about_breathship", "about_breathship_title", "What is Breathship?", Text),
    (
        "about_breathship",
        "about_breathship_subtitle",
        "The Science of Conscious Breathing",
        Text,
    ),
    (
        "about_breathship",
        "about_breathship",
        "Breathship is more than just breathing exercises. It is a comprehensive approach to wellness that combines ancient wisdom with modern science.",
        Textarea,
    ),
    (
        "about_breathship",
        "about_breathship_description",
        "Breathship is a comprehensive approach to breathwork that combines traditional techniques with modern understanding of the nervous system. Our sessions help you release stress, heal trauma, and access deeper states of consciousness.",
        Textarea,
    ),
    // Sessions
    ("sessions", "sessions_title", "Upcoming Sessions", Text),
    (
        "sessions",
        "sessions_subtitle",
        "Transform your life with our carefully crafted breathwork sessions.",
        Textarea,
    ),
    ("sessions", "sessions_badge_text", "Join Our Next Sessions", Text),
    ("sessions", "sessions_cta", "View All Sessions", Text),
    // Why choose us
    ("why_choose", "why_choose_title", "Your Journey to Transformation", Text),
    (
        "why_choose",
        "why_choose_subtitle",
        "We combine ancient wisdom with modern science to create the most effective breathwork experience.",
        Textarea,
    ),
    ("why_choose", "why_choose_badge_text", "Why Choose Breathship", Text),
    ("why_choose", "why_choose_cta_title", "Ready to Begin Your Transformation?", Text),
    (
        "why_choose",
        "why_choose_cta_subtitle",
        "Join our community of healing and discover the profound benefits of conscious breathing.",
        Textarea,
    ),
    ("why_choose", "why_choose_cta_primary", "Book Your First Session", Text),
    ("why_choose", "why_choose_cta_secondary", "Learn More", Text),
    ("why_choose", "why_choose_us_title", "Why Choose Breathship?", Text),
    ("why_choose", "why_choose_us_subtitle", "Experience the Difference", Text),
    ("why_choose", "why_choose_us_feature_1_title", "Certified Expertise", Text),
    (
        "why_choose",
        "why_choose_us_feature_1_description",
        "Learn from certified breathwork facilitators with extensive training and experience.",
        Textarea,
    ),
    ("why_choose", "why_choose_us_feature_2_title", "Evidence-Based", Text),
    (
        "why_choose",
        "why_choose_us_feature_2_description",
        "Our techniques are backed by scientific research and proven to be effective.",
        Textarea,
    ),
    ("why_choose", "why_choose_us_feature_3_title", "Safe Environment", Text),
    (
        "why_choose",
        "why_choose_us_feature_3_description",
        "Create a safe, supportive space for your healing journey.",
        Textarea,
    ),
    // Testimonials
    ("testimonials", "testimonials_title", "What Our Clients Say", Text),
    (
        "testimonials",
        "testimonials_subtitle",
        "Real stories from people who have transformed their lives through breathwork.",
        Textarea,
    ),
    ("testimonials", "testimonials_badge_text", "Client Success Stories", Text),
    ("testimonials", "testimonials_stats_clients", "500+", Text),
    ("testimonials", "testimonials_stats_clients_text", "Clients Served", Text),
    ("testimonials", "testimonials_stats_rating", "4.9/5", Text),
    ("testimonials", "testimonials_stats_rating_text", "Average Rating", Text),
    ("testimonials", "testimonials_stats_sessions", "1000+", Text),
    ("testimonials", "testimonials_stats_sessions_text", "Sessions Completed", Text),
    ("testimonials", "testimonials_stats_success", "95%", Text),
    ("testimonials", "testimonials_stats_success_text", "Success Rate", Text),
    // Blogs
    ("blogs", "blogs_title", "Latest Insights", Text),
    (
        "blogs",
        "blogs_subtitle",
        "Explore articles about breathwork, mindfulness, and transformation.",
        Textarea,
    ),
    // Contact
    ("contact", "contact_title", "Get in Touch", Text),
    (
        "contact",
        "contact_subtitle",
        "Ready to begin your breathwork journey? Contact us to schedule your first session.",
        Textarea,
    ),
    (
        "contact",
        "contact_description",
        "Book a session or ask us any questions. We are here to support your breathwork journey.",
        Textarea,
    ),
    ("contact", "contact_email", "hello@breathship.com", Text),
    ("contact", "contact_phone", "+1 (555) 123-4567", Text),
    ("contact", "contact_address", "123 Breathing Street, Peace City, PC 12345", Text),
    ("contact", "contact_location", "San Francisco, CA", Text),
    (
        "contact",
        "contact_location_details",
        "Sessions available in-person and online",
        Text,
    ),
    (
        "contact",
        "contact_quote",
        "Every breath is a new beginning. Take the first step towards your transformation today.",
        Textarea,
    ),
    (
        "contact",
        "contact_image",
        "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=600&h=400&fit=crop",
        Image,
    ),
    // Corporate
    ("corporate", "corporate_title", "Corporate Wellness Programs", Text),
    (
        "corporate",
        "corporate_subtitle",
        "Transform your workplace culture with evidence-based breathwork programs designed to reduce stress, improve focus, and enhance team collaboration.",
        Textarea,
    ),
    (
        "corporate",
        "corporate_description",
        "Our corporate wellness programs are designed to help your team manage stress, improve focus, and create a healthier workplace culture through the power of conscious breathing.",
        Textarea,
    ),
    // Footer
    (
        "footer",
        "footer_description",
        "Transform your life through the power of conscious breathing.",
        Textarea,
    ),
    ("footer", "footer_copyright", "© 2024 Breathship. All rights reserved.", Text),
    ("footer", "footer_privacy_link", "/privacy", Text),
    ("footer", "footer_terms_link", "/terms", Text),
];

/// Every built-in content field, numbered and ordered within its section.
#[must_use]
pub fn content_fields() -> Vec<ContentField> {
    let mut fields: Vec<ContentField> = Vec::with_capacity(CONTENT.len());
    let mut order = 0;
    for (index, (section, name, value, field_type)) in CONTENT.iter().enumerate() {
        order = match fields.last() {
            Some(prev) if prev.section == *section => order + 1,
            _ => 1,
        };
        let mut field = ContentField::new(section, name, value, *field_type, order);
        field.id = (index + 1).to_string();
        fields.push(field);
    }
    fields
}

/// The built-in content as a lookup table.
#[must_use]
pub fn content_map() -> ContentMap {
    CONTENT
        .iter()
        .map(|(_, name, value, _)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

/// Built-in value for one content key.
#[must_use]
pub fn content_value(field_name: &str) -> Option<&'static str> {
    CONTENT
        .iter()
        .find(|(_, name, _, _)| *name == field_name)
        .map(|(_, _, value, _)| *value)
}

#[allow(clippy::too_many_arguments)]
fn session(
    id: &str,
    title: &str,
    date: &str,
    time: &str,
    tag: SessionTag,
    slug: &str,
    description: &str,
    image: &str,
    created_at: &str,
) -> Session {
    Session {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        image_link: format!("https://images.unsplash.com/{image}?w=800&h=600&fit=crop"),
        session_tag: Some(tag),
        payment_link: format!("https://example.com/pay/{slug}"),
        is_active: VisibilityFlag::shown(),
        created_at: Some(created_at.to_string()),
        ..Session::default()
    }
}

/// The three built-in sessions.
#[must_use]
pub fn sessions() -> Vec<Session> {
    vec![
        session(
            "1",
            "Introduction to Breathwork",
            "2024-02-15",
            "10:00 AM",
            SessionTag::Group,
            "intro",
            "Perfect for beginners! Learn the fundamentals of conscious breathing and discover how it can transform your life.",
            "photo-1506905925346-21bda4d32df4",
            "2024-01-15T10:00:00Z",
        ),
        session(
            "2",
            "Deep Healing Session",
            "2024-02-20",
            "2:00 PM",
            SessionTag::OneOnOne,
            "healing",
            "A personalized session focused on deep emotional healing through advanced breathwork techniques.",
            "photo-1544367567-0f2fcb009e0b",
            "2024-01-16T14:30:00Z",
        ),
        session(
            "3",
            "Corporate Wellness Workshop",
            "2024-02-25",
            "9:00 AM",
            SessionTag::Corporate,
            "corporate",
            "Transform your workplace culture with stress-reducing breathwork techniques designed for busy professionals.",
            "photo-1522202176988-66273c2fd55f",
            "2024-01-17T09:15:00Z",
        ),
    ]
}

fn blog(id: &str, title: &str, image: &str, excerpt: &str, content: &str, created_at: &str) -> Blog {
    Blog {
        id: id.to_string(),
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        content: content.to_string(),
        image_link: format!("https://images.unsplash.com/{image}?w=800&h=600&fit=crop"),
        is_published: VisibilityFlag::shown(),
        created_at: Some(created_at.to_string()),
    }
}

/// The three built-in blog posts, newest first.
#[must_use]
pub fn blogs() -> Vec<Blog> {
    vec![
        blog(
            "1",
            "The Science Behind Breathwork",
            "photo-1559757148-5c350d0d3c56",
            "Discover the fascinating research that proves how conscious breathing can transform your physical and mental health.",
            "<h2>The Science Behind Breathwork</h2>\
             <p>Breathwork is backed by solid scientific research. Studies have shown that conscious breathing can:</p>\
             <ul><li>Reduce cortisol levels</li><li>Increase oxygen saturation in the blood</li>\
             <li>Activate the parasympathetic nervous system</li><li>Improve cognitive function and focus</li></ul>",
            "2024-01-15T10:00:00Z",
        ),
        blog(
            "2",
            "5 Simple Breathing Techniques for Daily Stress Relief",
            "photo-1506905925346-21bda4d32df4",
            "Learn five powerful breathing techniques you can use anywhere, anytime to reduce stress and find calm.",
            "<h2>5 Simple Breathing Techniques for Daily Stress Relief</h2>\
             <h3>1. Box Breathing (4-4-4-4)</h3><p>Inhale for 4 counts, hold for 4, exhale for 4, hold for 4.</p>\
             <h3>2. 4-7-8 Breathing</h3><p>Inhale for 4, hold for 7, exhale for 8.</p>\
             <h3>3. Belly Breathing</h3><p>Breathe deeply, feeling your belly rise and fall.</p>\
             <h3>4. Alternate Nostril Breathing</h3><p>Close one nostril, inhale through the other, then switch.</p>\
             <h3>5. Sigh Breathing</h3><p>Take a deep breath and let out a long, audible sigh.</p>",
            "2024-01-10T14:30:00Z",
        ),
        blog(
            "3",
            "How Breathwork Changed My Life",
            "photo-1544367567-0f2fcb009e0b",
            "A personal journey from chronic anxiety to inner peace through the power of conscious breathing.",
            "<h2>How Breathwork Changed My Life</h2>\
             <p>Three years ago, I was struggling with chronic anxiety that was affecting every aspect of my life.</p>\
             <p>Within just a few weeks of daily practice, I began to notice changes.</p>",
            "2024-01-05T09:15:00Z",
        ),
    ]
}

fn testimonial(id: &str, name: &str, text: &str, image: &str, created_at: &str) -> Testimonial {
    Testimonial {
        id: id.to_string(),
        name: name.to_string(),
        text: text.to_string(),
        image_link: format!(
            "https://images.unsplash.com/{image}?w=150&h=150&fit=crop&crop=face"
        ),
        is_active: VisibilityFlag::shown(),
        is_featured: false,
        created_at: Some(created_at.to_string()),
    }
}

/// The five built-in testimonials, newest first.
#[must_use]
pub fn testimonials() -> Vec<Testimonial> {
    vec![
        testimonial(
            "1",
            "Sarah Johnson",
            "Breathwork has completely transformed my approach to stress management. I feel more centered and peaceful than ever before.",
            "photo-1494790108755-2616b612b786",
            "2024-01-15T10:00:00Z",
        ),
        testimonial(
            "2",
            "Michael Chen",
            "After just three sessions, I noticed a significant improvement in my sleep quality and overall mood. Highly recommend!",
            "photo-1507003211169-0a1dd7228f2d",
            "2024-01-14T14:30:00Z",
        ),
        testimonial(
            "3",
            "Emma Rodriguez",
            "The corporate workshop was exactly what our team needed. We're all feeling more focused and less stressed at work.",
            "photo-1438761681033-6461ffad8d80",
            "2024-01-13T16:45:00Z",
        ),
        testimonial(
            "4",
            "David Thompson",
            "I was skeptical at first, but the results speak for themselves. My anxiety has decreased dramatically since starting breathwork.",
            "photo-1472099645785-5658abf4ff4e",
            "2024-01-12T11:20:00Z",
        ),
        testimonial(
            "5",
            "Lisa Park",
            "The one-on-one sessions helped me work through some deep emotional blocks. I feel lighter and more free than ever.",
            "photo-1544005313-94ddf0286df2",
            "2024-01-11T13:15:00Z",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::content::flatten;
    use crate::model::Entity;

    #[test]
    fn test_content_keys_are_unique() {
        let mut seen = HashSet::new();
        for field in content_fields() {
            assert!(seen.insert(field.field_name.clone()), "{}", field.field_name);
        }
    }

    #[test]
    fn test_content_fields_numbered_per_section() {
        let fields = content_fields();
        assert_eq!(fields[0].section, "header");
        assert_eq!(fields[0].display_order, 1);
        assert_eq!(fields[1].display_order, 2);
        assert_eq!(fields[2].section, "hero");
        assert_eq!(fields[2].display_order, 1);
        assert_eq!(fields[0].id, "1");
        assert!(fields.iter().all(Entity::is_visible));
    }

    #[test]
    fn test_content_map_matches_fields() {
        assert_eq!(content_map(), flatten(&content_fields()));
        assert!(!content_map().is_empty());
    }

    #[test]
    fn test_content_value_lookup() {
        assert_eq!(content_value("hero_text"), Some("Breathe. Heal. Transform."));
        assert_eq!(content_value("no_such_key"), None);
    }

    #[test]
    fn test_page_keys_present() {
        let map = content_map();
        for key in [
            "hero_text",
            "main_quote",
            "about_me",
            "about_breathship",
            "contact_quote",
            "footer_copyright",
            "header_company_name",
            "corporate_title",
        ] {
            assert!(map.contains_key(key), "{key}");
        }
    }

    #[test]
    fn test_entity_fallback_sizes() {
        assert_eq!(sessions().len(), 3);
        assert_eq!(blogs().len(), 3);
        assert_eq!(testimonials().len(), 5);
    }
}
