//! Job names offered as suggestions by the contact editor.

/// Alphabetical list of common jobs.
pub const JOBS: &[&str] = &[
    "Accountant",
    "Actor",
    "Actress",
    "Advisor",
    "Ambassador",
    "Animator",
    "Archer",
    "Architect",
    "Artist",
    "Astronaut",
    "Astronomer",
    "Athlete",
    "Attorney",
    "Auctioneer",
    "Author",
    "Babysitter",
    "Baker",
    "Ballet dancer",
    "Banker",
    "Barber",
    "Bartender",
    "Baseball player",
    "Basketball player",
    "Biologist",
    "Bookkeeper",
    "Bowler",
    "Boxer",
    "Builder",
    "Bus driver",
    "Butcher",
    "Butler",
    "Cab driver",
    "Calligrapher",
    "Captain",
    "Cardiologist",
    "Caregiver",
    "Carpenter",
    "Cartographer",
    "Cartoonist",
    "Cashier",
    "Catcher",
    "Caterer",
    "Cellist",
    "Chauffeur",
    "Chef",
    "Chemist",
    "Clergyman",
    "Clergywoman",
    "Clerk",
    "Coach",
    "Cobbler",
    "Composer",
    "Concierge",
    "Coroner",
    "Counselor",
    "Courier",
    "Cryptographer",
    "Custodian",
    "Dancer",
    "Dentist",
    "Deputy",
    "Dermatologist",
    "Designer",
    "Detective",
    "Director",
    "Diver",
    "Doctor",
    "Doorman",
    "Driver",
    "Drummer",
    "Ecologist",
    "Economist",
    "Editor",
    "Educator",
    "Electrician",
    "Engineer",
    "Entertainer",
    "Entomologist",
    "Entrepreneur",
    "Executive",
    "Explorer",
    "Exporter",
    "Exterminator",
    "Falconer",
    "Farmer",
    "Filmmaker",
    "Financier",
    "Firefighter",
    "Fisherman",
    "Florist",
    "Football player",
    "Garbage man",
    "Gardener",
    "Gatherer",
    "Gemcutter",
    "Geneticist",
    "Geographer",
    "Golfer",
    "Governor",
    "Grocer",
    "Hairdresser",
    "Harpist",
    "Housewife",
    "Hunter",
    "Illustrator",
    "Importer",
    "Instructor",
    "Intern",
    "Internist",
    "Interpreter",
    "Inventor",
    "Investigator",
    "Jailer",
    "Janitor",
    "Jester",
    "Jeweler",
    "Jockey",
    "Journalist",
    "Judge",
    "Laborer",
    "Landlord",
    "Laundress",
    "Lawyer",
    "Lecturer",
    "Librarian",
    "Librettist",
    "Lifeguard",
    "Linguist",
    "Locksmith",
    "Lyricist",
    "Magician",
    "Maid",
    "Mail carrier",
    "Manager",
    "Manga artist",
    "Manufacturer",
    "Marketer",
    "Mathematician",
    "Mayor",
    "Mechanic",
    "Midwife",
    "Miner",
    "Model",
    "Musician",
    "Navigator",
    "Negotiator",
    "Notary",
    "Novelist",
    "Nun",
    "Nurse",
    "Nutritionist",
    "Office worker",
    "Operator",
    "Ophthalmologist",
    "Optician",
    "Ornithologist",
    "Painter",
    "Paleontologist",
    "Paramedic",
    "Park ranger",
    "Pathologist",
    "Pawnbroker",
    "Pediatrician",
    "Percussionist",
    "Performer",
    "Pharmacist",
    "Photographer",
    "Physician",
    "Pianist",
    "Pilot",
    "Pitcher",
    "Plumber",
    "Poet",
    "Police",
    "Politician",
    "Pope",
    "Postman",
    "President",
    "Priest",
    "Producer",
    "Professor",
    "Programmer",
    "Psychologist",
    "Publisher",
    "Quarterback",
    "Radiologist",
    "Rancher",
    "Ranger",
    "Real estate agent",
    "Receptionist",
    "Referee",
    "Registrar",
    "Reporter",
    "Representative",
    "Researcher",
    "Restauranteur",
    "Retailer",
    "Retiree",
    "Sailor",
    "Salesperson",
    "Saleswoman",
    "Samurai",
    "Saxophonist",
    "Scholar",
    "Scientist",
    "Scout",
    "Scuba diver",
    "Seamstress",
    "Secretary",
    "Security guard",
    "Senator",
    "Sheriff",
    "Singer",
    "Smith",
    "Soldier",
    "Spy",
    "Statistician",
    "Stockbroker",
    "Street sweeper",
    "Student",
    "Surgeon",
    "Surveyor",
    "Swimmer",
    "Tailor",
    "Tax collector",
    "Taxi driver",
    "Taxidermist",
    "Teacher",
    "Technician",
    "Tennis player",
    "Therapist",
    "Tour guide",
    "Trader",
    "Trainer",
    "Translator",
    "Trash collector",
    "Treasurer",
    "Truck driver",
    "Tutor",
    "Typist",
    "Umpire",
    "Undertaker",
    "Valet",
    "Veteran",
    "Veterinarian",
    "Vicar",
    "Videographer",
    "Violinist",
    "Waiter",
    "Waitress",
    "Warden",
    "Warrior",
    "Watchmaker",
    "Weaver",
    "Welder",
    "Woodcarver",
    "Workman",
    "Writer",
    "Zookeeper",
    "Zoologist",
];

/// Jobs starting with `prefix`, ignoring case.
pub fn suggest(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
    let prefix = prefix.trim().to_lowercase();
    JOBS.iter()
        .copied()
        .filter(move |job| !prefix.is_empty() && job.to_lowercase().starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_sorted() {
        assert!(JOBS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn suggestions_ignore_case() {
        let found: Vec<_> = suggest("pil").collect();
        assert_eq!(found, vec!["Pilot"]);
        assert_eq!(suggest("").count(), 0);
    }
}
