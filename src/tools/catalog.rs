//! Flavor tables for the break tools.

pub const NETFLIX_SERIES: &[&str] = &[
    "Stranger Things",
    "Squid Game",
    "The Glory",
    "Kingdom",
    "All of Us Are Dead",
    "Sweet Home",
    "My Liberation Notes",
    "Extraordinary Attorney Woo",
];

pub const MEMES: &[&str] = &[
    "Developer debugging for 10 hours.jpg",
    "Bug that only shows up in production.gif",
    "Another meeting?.png",
    "Friday 6pm.jpg",
    "New hire receiving code review.jpg",
    "The night before a release.png",
    "Deployed without tests.gif",
    "Copy-pasted from Stack Overflow.jpg",
];

pub const BATHROOM_ACTIVITIES: &[&str] = &[
    "scrolling the phone feed",
    "catching up on webtoons",
    "checking stock prices",
    "replying to group chats",
    "watching short-form videos",
];

pub const COFFEE_ROUTES: &[&str] = &[
    "the long way past every other team",
    "a detour through the rooftop garden",
    "the cafe two blocks away",
    "a lap around the whole floor",
    "the vending machine on the far side of the building",
];

pub const CALL_EXCUSES: &[&str] = &[
    "the delivery driver can't find the building",
    "the bank needs to verify something",
    "a family matter that can't wait",
    "the landlord about the boiler",
    "an old friend with urgent news",
];

pub const THINKING_TOPICS: &[&str] = &[
    "what to have for lunch",
    "the weekend travel plan",
    "whether aliens exist",
    "the meaning of life",
    "the perfect retirement",
];

pub const SHOPPING_ACTIVITIES: &[&str] = &[
    "comparing prices on a new keyboard",
    "browsing the seasonal sale",
    "filling the cart for payday",
    "reading product reviews",
    "hunting for limited-edition sneakers",
];

pub const CHIMAC_COMBOS: &[&str] = &[
    "fried chicken and a cold draft",
    "spicy glazed chicken and lager",
    "soy garlic chicken and a pale ale",
    "half-and-half with a pitcher",
];

pub const LEAVE_PLANS: &[&str] = &[
    "sneaking out before the standup",
    "announcing a sudden dentist appointment",
    "leaving the laptop open as a decoy",
    "walking out with confidence",
];

pub const DINNER_EVENTS: &[&str] = &[
    "the manager picked up the tab",
    "endless rounds of toasts",
    "karaoke that never ends",
    "the team finally bonded",
    "seated next to the director",
];
