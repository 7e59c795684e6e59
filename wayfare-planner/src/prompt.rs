use crate::models::TripPlanRequest;

/// System prompt: pins the model to the Indian-transport domain and demands
/// strict JSON output.
pub fn system_prompt() -> String {
    "You are an expert travel planning AI with deep knowledge of Indian transportation systems, including:\n\
- Major airlines (IndiGo, Air India, SpiceJet, Vistara, AirAsia India, Akasa Air, etc.)\n\
- Indian Railways train routes, train numbers, and station codes\n\
- Interstate bus services and operators\n\
- Accurate, realistic pricing in INR\n\n\
You MUST provide REAL and ACCURATE flight numbers, train numbers and names, airport codes, and railway station codes, with realistic departure and arrival times.\n\n\
Return ONLY valid JSON with no additional text."
        .to_string()
}

/// User prompt: the concrete trip request plus the exact response schema the
/// parser expects.
pub fn user_prompt(req: &TripPlanRequest) -> String {
    format!(
        "Create a {num_days}-day trip itinerary for {travelers} traveler(s) traveling from {from} to {to}.\n\n\
TRIP DETAILS:\n\
- Departure city: {from}\n\
- Destination: {to}\n\
- Budget: INR {budget} (total for all travelers)\n\
- Interests: {interests}\n\
- Travel dates: {start} to {end}\n\n\
TRANSPORT REQUIREMENTS:\n\
1. FIRST STEP: outbound transport from {from} to {to} with a real service number, correct station/airport codes and realistic times.\n\
2. LAST STEP: return transport from {to} to {from} with the same accuracy.\n\
3. For flights use the format \"IndiGo 6E 2341\"; for trains use \"12841 Coromandel Express\".\n\n\
LOCATION REQUIREMENTS:\n\
- Use exact location names for all activities and include precise GPS coordinates (latitude, longitude) for each.\n\n\
Return a JSON object with this exact structure:\n\
{{\n\
  \"title\": \"Trip title\",\n\
  \"reason\": \"Brief reason why this is a great trip (1 sentence)\",\n\
  \"steps\": [\n\
    {{\n\
      \"id\": \"unique-id-1\",\n\
      \"day\": 1,\n\
      \"time\": \"09:00\",\n\
      \"title\": \"IndiGo Flight 6E 2341 to {to}\",\n\
      \"description\": \"Step description with timings\",\n\
      \"location\": \"Exact place name\",\n\
      \"coordinates\": {{ \"lat\": 23.3143, \"lng\": 85.3217 }},\n\
      \"duration\": \"2h 30m\",\n\
      \"category\": \"transport\",\n\
      \"isBookable\": true,\n\
      \"estimatedCost\": 4500\n\
    }}\n\
  ]\n\
}}\n\n\
Categories: transport, accommodation, activity, food, sightseeing.\n\
Include 4-6 steps per day with accurate timings.\n\
All costs must be realistic prices in INR.\n\
Each step must have a unique id.",
        num_days = req.num_days(),
        travelers = req.travelers,
        from = req.current_location,
        to = req.destination,
        budget = req.budget_inr,
        interests = req.interests.join(", "),
        start = req.start_date,
        end = req.end_date,
    )
}

/// Models often wrap JSON in a markdown fence despite instructions; strip it
/// before parsing.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}
