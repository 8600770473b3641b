//! Static portfolio content shown next to the chat

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub eyebrow: &'static str,
    pub name: &'static str,
    pub tag: &'static str,
    pub headline: &'static str,
    pub headline_accent: &'static str,
    pub intro: &'static str,
    pub stats: &'static [Stat],
    pub highlights: &'static [&'static str],
    pub links: &'static [Link],
}

pub const PROFILE: Profile = Profile {
    eyebrow: "Portfolio AI",
    name: "Sunay Revad",
    tag: "About Sunay",
    headline: "Curious builder with",
    headline_accent: "startup-driven execution.",
    intro: "DAIICT ICT student focused on full-stack product building, strong DSA practice, \
            and AI-driven application thinking.",
    stats: &[
        Stat { label: "Builder Focus", value: "Product + AI + Full-stack" },
        Stat { label: "Core Strength", value: "DSA + Deployable Projects" },
        Stat { label: "Current Goal", value: "Internship + Startup readiness" },
    ],
    highlights: &[
        "Built and deployed AI Finance Platform and Blog Platform.",
        "Combines practical project building with disciplined DSA preparation.",
        "Strong interest in personalization systems and AI startup ideas.",
    ],
    links: &[
        Link { label: "GitHub", url: "https://github.com/Sunay4826" },
        Link { label: "AI Finance", url: "https://ai-finance-platform-3qj9.vercel.app" },
        Link { label: "Blog Platform", url: "https://blog-sbyr.vercel.app/signin" },
    ],
};
